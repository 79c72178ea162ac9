use proptest::prelude::*;

use subgen_types::{PreparedRecord, Record, RecordHash, Tag, Timestamp};

proptest! {
    /// RecordHash hex text parses back to the same hash.
    #[test]
    fn record_hash_hex_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = RecordHash::new(bytes);
        let parsed: RecordHash = hash.to_string().parse().unwrap();
        prop_assert_eq!(parsed, hash);
    }

    /// RecordHash::is_zero is true only for all-zero bytes.
    #[test]
    fn record_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = RecordHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Tags built from the tryte alphabet are always accepted and pad to full width.
    #[test]
    fn tryte_tags_accepted(tag in "[A-Z9]{0,27}") {
        let parsed = Tag::new(tag.clone()).unwrap();
        prop_assert_eq!(parsed.as_str(), tag.as_str());
        prop_assert_eq!(parsed.padded().len(), Tag::MAX_LEN);
    }

    /// Any attached record survives bincode and still verifies.
    #[test]
    fn attached_record_bincode_roundtrip(
        trunk in prop::array::uniform32(0u8..),
        branch in prop::array::uniform32(0u8..),
        nonce in any::<u64>(),
        created in any::<u64>(),
    ) {
        let prepared = PreparedRecord {
            address: "9".repeat(81),
            value: 0,
            tag: Tag::new("SUBGEN").unwrap(),
            created_at: Timestamp::new(created),
        };
        let record = Record::attach(
            prepared,
            RecordHash::new(trunk),
            RecordHash::new(branch),
            Timestamp::new(created.saturating_add(1)),
            nonce,
        );
        let encoded = bincode::serialize(&record).unwrap();
        let decoded: Record = bincode::deserialize(&encoded).unwrap();
        prop_assert!(decoded.verify_hash());
        prop_assert_eq!(decoded, record);
    }
}
