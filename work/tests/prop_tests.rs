use proptest::prelude::*;

use subgen_work::{difficulty_for_weight, validate_work, WorkGenerator};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Generated PoW always passes its own validation.
    #[test]
    fn generated_pow_always_valid(
        essence in prop::array::uniform32(0u8..),
        weight in 0u8..=8,
    ) {
        let difficulty = difficulty_for_weight(weight).unwrap();
        let nonce = WorkGenerator.generate(&essence, difficulty).unwrap();
        prop_assert!(
            validate_work(&essence, nonce.0, difficulty),
            "generated nonce must pass validation"
        );
    }

    /// Zero difficulty always passes regardless of nonce.
    #[test]
    fn zero_difficulty_always_passes(
        essence in prop::array::uniform32(0u8..),
        nonce in any::<u64>(),
    ) {
        prop_assert!(validate_work(&essence, nonce, 0));
    }
}
