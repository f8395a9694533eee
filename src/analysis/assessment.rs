//! Interoperability verdict from the aggregated statistics.

use super::types::*;

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("Expected ping attempts must be greater than zero")]
    ZeroExpectedAttempts,
}

/// Bucket a mean RTT; 0 means no data was observed
pub fn performance_category(average_rtt_ms: f64) -> PerformanceCategory {
    if average_rtt_ms == 0.0 {
        PerformanceCategory::NoData
    } else if average_rtt_ms < 10.0 {
        PerformanceCategory::Excellent
    } else if average_rtt_ms < 50.0 {
        PerformanceCategory::Good
    } else if average_rtt_ms < 100.0 {
        PerformanceCategory::Fair
    } else {
        PerformanceCategory::Poor
    }
}

/// Success rate in percent at full precision
pub fn success_rate(successful: u32, expected_attempts: u32) -> Result<f64, AssessmentError> {
    if expected_attempts == 0 {
        return Err(AssessmentError::ZeroExpectedAttempts);
    }
    Ok(100.0 * successful as f64 / expected_attempts as f64)
}

/// Apply the threshold rules to one run
pub fn assess(
    stats: &OverallStats,
    client: &ClientRunResult,
    server: &ServerRunResult,
) -> Result<InteropAssessment, AssessmentError> {
    let rate = success_rate(stats.successful_pings, stats.total_ping_attempts)?;

    let interoperability_status = if rate >= PASS_THRESHOLD_PERCENT {
        InteropStatus::Pass
    } else {
        InteropStatus::Fail
    };

    Ok(InteropAssessment {
        success_rate_percentage: (rate * 10.0).round() / 10.0,
        interoperability_status,
        connection_compatibility: server.startup_successful
            && client.connection_status == ConnectionStatus::Connected,
        protocol_compliance: !client.rtts.is_empty(),
        performance_category: performance_category(stats.average_rtt_ms.unwrap_or(0.0)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(successful: u32, average: Option<f64>) -> OverallStats {
        OverallStats {
            total_ping_attempts: EXPECTED_PING_ATTEMPTS,
            successful_pings: successful,
            failed_pings: 0,
            average_rtt_ms: average,
            min_rtt_ms: average,
            max_rtt_ms: average,
            std_dev_rtt_ms: average.map(|_| 0.0),
            connection_established: true,
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let client = ClientRunResult::default();
        let server = ServerRunResult::default();

        let a = assess(&stats(3, Some(5.0)), &client, &server).unwrap();
        assert_eq!(a.success_rate_percentage, 60.0);
        assert_eq!(a.interoperability_status, InteropStatus::Pass);

        let a = assess(&stats(2, Some(5.0)), &client, &server).unwrap();
        assert_eq!(a.success_rate_percentage, 40.0);
        assert_eq!(a.interoperability_status, InteropStatus::Fail);
    }

    #[test]
    fn test_success_rate_for_every_count() {
        for successful in 0..=5 {
            let rate = success_rate(successful, EXPECTED_PING_ATTEMPTS).unwrap();
            assert_eq!(rate, 20.0 * successful as f64);
        }
        assert!(success_rate(1, 0).is_err());
    }

    #[test]
    fn test_performance_buckets() {
        assert_eq!(performance_category(0.0), PerformanceCategory::NoData);
        assert_eq!(performance_category(9.99), PerformanceCategory::Excellent);
        assert_eq!(performance_category(10.0), PerformanceCategory::Good);
        assert_eq!(performance_category(49.99), PerformanceCategory::Good);
        assert_eq!(performance_category(50.0), PerformanceCategory::Fair);
        assert_eq!(performance_category(100.0), PerformanceCategory::Poor);
    }

    #[test]
    fn test_compatibility_and_compliance() {
        let client = ClientRunResult {
            connection_status: ConnectionStatus::Connected,
            rtts: vec![3.0],
            successful_pings: 1,
            ..Default::default()
        };
        let mut server = ServerRunResult {
            startup_successful: true,
            ..Default::default()
        };

        let a = assess(&stats(1, Some(3.0)), &client, &server).unwrap();
        assert!(a.connection_compatibility);
        assert!(a.protocol_compliance);
        assert_eq!(a.performance_category, PerformanceCategory::Excellent);

        server.startup_successful = false;
        let a = assess(&stats(1, Some(3.0)), &client, &server).unwrap();
        assert!(!a.connection_compatibility);
    }

    #[test]
    fn test_no_data_without_samples() {
        let a = assess(
            &stats(0, None),
            &ClientRunResult::default(),
            &ServerRunResult::default(),
        )
        .unwrap();
        assert_eq!(a.performance_category, PerformanceCategory::NoData);
        assert!(!a.protocol_compliance);
    }
}
