//! Weight-magnitude to difficulty conversion.

use crate::WorkError;

/// Convert a minimum weight magnitude into a work-value threshold.
///
/// A weight magnitude of `m` requires the top `m` bits of the work value to be
/// set, i.e. one in `2^m` nonces qualifies on average. A magnitude of 0
/// disables the check.
pub fn difficulty_for_weight(min_weight_magnitude: u8) -> Result<u64, WorkError> {
    match min_weight_magnitude {
        0 => Ok(0),
        1..=63 => Ok(!(u64::MAX >> min_weight_magnitude)),
        64 => Ok(u64::MAX),
        m => Err(WorkError::InvalidWeight(m)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weight_disables_work() {
        assert_eq!(difficulty_for_weight(0).unwrap(), 0);
    }

    #[test]
    fn weight_sets_leading_bits() {
        assert_eq!(difficulty_for_weight(1).unwrap(), 0x8000_0000_0000_0000);
        assert_eq!(difficulty_for_weight(14).unwrap(), 0xFFFC_0000_0000_0000);
        assert_eq!(difficulty_for_weight(64).unwrap(), u64::MAX);
    }

    #[test]
    fn heavier_weight_is_harder() {
        let light = difficulty_for_weight(9).unwrap();
        let heavy = difficulty_for_weight(14).unwrap();
        assert!(heavy > light);
    }

    #[test]
    fn weight_above_64_rejected() {
        assert!(matches!(
            difficulty_for_weight(65),
            Err(WorkError::InvalidWeight(65))
        ));
    }
}
