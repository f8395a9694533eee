//! # Interop Harness - ping interoperability checks between libp2p stacks
//!
//! This library provides the two halves of a cross-implementation ping test:
//! a node that listens or dials and narrates what it sees on stdout, and an
//! offline analyzer that turns two such logs into a PASS/FAIL report.
//!
//! ## Overview
//!
//! The stages never talk to each other directly. A node run produces a log
//! file; the analyzer reads the logs afterwards (a missing log is treated as
//! an empty one) and writes `results/metrics_report.json`.
//!
//! ## Architecture
//!
//! - `node`: the `PeerHost` capability trait, its libp2p implementation and
//!   the `NodeDriver` that runs responder or initiator mode
//! - `analysis`: pattern extraction, per-role log parsing, statistics,
//!   assessment and report output
//! - `config` / `config_loader`: YAML configuration shared by both binaries
//!
//! ## Node log contract
//!
//! ```text
//! Peer ID: <id>
//! Listening on: <addr>/p2p/<id>
//! Connecting to peer: <id>
//! Connected to <id>
//! Message <n> - Connection active
//! Message <n> failed: <reason>
//! Connection failed: <reason>
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use interop_harness::analysis;
//!
//! let client = analysis::parse_client_log(Path::new("results/py-client-test1.log"))?;
//! let server = analysis::parse_server_log(Path::new("results/go-server.log"))?;
//! let report = analysis::build_report(
//!     chrono::Local::now().to_rfc3339(),
//!     server,
//!     client,
//! )?;
//! println!("{}", report.interoperability_assessment.interoperability_status);
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Error Handling
//!
//! Library seams use `thiserror` enums (`HostError`, `NodeError`,
//! `AssessmentError`, `ValidationError`); file-level operations and the
//! binaries use `color_eyre` for context-rich reports.

pub mod analysis;
pub mod config;
pub mod config_loader;
pub mod node;
