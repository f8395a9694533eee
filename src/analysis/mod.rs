//! Offline analysis of interop node logs.
//!
//! Pattern extraction, per-role parsing, statistics, the PASS/FAIL
//! assessment and report output, run strictly in that order.

pub mod types;
pub mod patterns;
pub mod log_parser;
pub mod metrics;
pub mod assessment;
pub mod report;

pub use types::*;
pub use log_parser::{parse_client_log, parse_server_log};
pub use metrics::build_report;
pub use assessment::AssessmentError;
pub use report::{generate_json_report, generate_text_report, print_summary};
