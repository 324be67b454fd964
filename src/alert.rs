//! The daily usage threshold alert.

use std::{
    fmt,
    io::{self, Write},
};

use log::warn;

use crate::collection::Measurement;

/// Whether a measurement is within the configured limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertStatus {
    Ok,
    Exceeded { total_mb: f64, limit_mb: f64 },
}

impl AlertStatus {
    pub fn is_exceeded(&self) -> bool {
        matches!(self, AlertStatus::Exceeded { .. })
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Ok => write!(f, "within limit"),
            AlertStatus::Exceeded { total_mb, limit_mb } => {
                write!(f, "daily usage {total_mb} MB exceeds the {limit_mb} MB limit")
            }
        }
    }
}

/// Compares the measurement's total against `limit_mb`. Only a total strictly
/// greater than the limit counts as exceeded.
pub fn evaluate(measurement: &Measurement, limit_mb: f64) -> AlertStatus {
    let total_mb = measurement.total();
    if total_mb > limit_mb {
        AlertStatus::Exceeded { total_mb, limit_mb }
    } else {
        AlertStatus::Ok
    }
}

/// The configured threshold, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlertPolicy {
    limit_mb: Option<f64>,
}

impl AlertPolicy {
    pub fn new(limit_mb: Option<f64>) -> Self {
        Self { limit_mb }
    }

    pub fn limit_mb(&self) -> Option<f64> {
        self.limit_mb
    }

    /// Evaluates the measurement; with no limit configured this is always
    /// [`AlertStatus::Ok`].
    pub fn evaluate(&self, measurement: &Measurement) -> AlertStatus {
        match self.limit_mb {
            Some(limit_mb) => evaluate(measurement, limit_mb),
            None => AlertStatus::Ok,
        }
    }
}

/// Receives exceeded alerts. Called once per tick that evaluates as exceeded.
pub trait Notifier {
    fn notify(&mut self, status: &AlertStatus);
}

/// Rings the terminal bell and prints the alert to stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&mut self, status: &AlertStatus) {
        warn!("Usage alert: {status}");

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "\x07Warning: {status}.");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn boundary_is_not_exceeded() {
        let m = Measurement::new(10.0, 20.0);

        assert_eq!(evaluate(&m, 30.0), AlertStatus::Ok);
        assert_eq!(evaluate(&m, 31.0), AlertStatus::Ok);
        assert_eq!(
            evaluate(&m, 29.99),
            AlertStatus::Exceeded {
                total_mb: 30.0,
                limit_mb: 29.99
            }
        );
    }

    #[test]
    fn exceeded_matches_strict_comparison() {
        for total in [0.0, 0.5, 1.0, 99.99, 100.0, 100.01, 5000.0] {
            for limit in [0.0, 1.0, 100.0, 1000.0] {
                let status = evaluate(&Measurement::new(total, 0.0), limit);
                assert_eq!(status.is_exceeded(), total > limit, "total={total} limit={limit}");
            }
        }
    }

    #[test]
    fn no_limit_never_alerts() {
        let policy = AlertPolicy::default();
        assert_eq!(policy.evaluate(&Measurement::new(1e9, 1e9)), AlertStatus::Ok);
    }

    #[test]
    fn zero_usage_with_zero_limit_is_ok() {
        let policy = AlertPolicy::new(Some(0.0));
        assert_eq!(policy.limit_mb(), Some(0.0));
        assert_eq!(policy.evaluate(&Measurement::default()), AlertStatus::Ok);
        assert!(policy.evaluate(&Measurement::new(0.01, 0.0)).is_exceeded());
    }
}
