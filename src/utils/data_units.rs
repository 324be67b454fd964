//! Unit conversion for the values stored in the ledgers.

pub const MEBI_LIMIT: u64 = 1024 * 1024;

pub const MEBI_LIMIT_F64: f64 = 1024.0 * 1024.0;

/// Rounds a value to two decimal places, which is the precision every
/// megabyte figure is stored and displayed with.
#[inline]
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a byte count into megabytes (units of 1024²), rounded to two
/// decimal places.
#[inline]
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round_hundredths(bytes as f64 / MEBI_LIMIT_F64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bytes_to_mb() {
        assert_eq!(bytes_to_mb(0), 0.0);
        assert_eq!(bytes_to_mb(MEBI_LIMIT), 1.0);
        assert_eq!(bytes_to_mb(MEBI_LIMIT * 10 + MEBI_LIMIT / 2), 10.5);
        assert_eq!(bytes_to_mb(1024), 0.0);
        assert_eq!(bytes_to_mb(MEBI_LIMIT / 4 * 81), 20.25);
    }

    #[test]
    fn test_round_hundredths() {
        assert_eq!(round_hundredths(10.5 + 20.25), 30.75);
        assert_eq!(round_hundredths(0.1 + 0.2), 0.3);
        assert_eq!(round_hundredths(1.005_1), 1.01);
    }
}
