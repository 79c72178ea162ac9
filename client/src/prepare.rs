//! Transfer preparation.
//!
//! Only zero-value transfers are supported: they need no inputs and no
//! signatures, so preparation happens entirely on this side of the wire.

use serde::{Deserialize, Serialize};

use subgen_types::{PreparedRecord, Tag, Timestamp};

use crate::{ClientError, NULL_ADDRESS};

/// A single output of a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub address: String,
    pub value: u64,
    pub tag: Tag,
}

impl Transfer {
    /// A zero-value transfer to the null address carrying `tag`.
    pub fn empty(tag: Tag) -> Self {
        Self {
            address: NULL_ADDRESS.to_string(),
            value: 0,
            tag,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PrepareOptions {
    /// Creation time to stamp on the payloads; defaults to now.
    pub timestamp: Option<Timestamp>,
}

/// Prepare zero-value transfers into unattached payloads.
pub fn prepare_zero_value(
    transfers: &[Transfer],
    options: &PrepareOptions,
) -> Result<Vec<PreparedRecord>, ClientError> {
    if transfers.is_empty() {
        return Err(ClientError::Other("no transfers to prepare".into()));
    }
    if let Some(t) = transfers.iter().find(|t| t.value > 0) {
        return Err(ClientError::Other(format!(
            "value transfer of {} to {} needs signed inputs, which are not supported",
            t.value, t.address
        )));
    }

    let created_at = options.timestamp.unwrap_or_else(Timestamp::now);
    Ok(transfers
        .iter()
        .map(|t| PreparedRecord {
            address: t.address.clone(),
            value: 0,
            tag: t.tag.clone(),
            created_at,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transfer_prepares_one_payload() {
        let tag = Tag::new("SUBGEN").unwrap();
        let options = PrepareOptions {
            timestamp: Some(Timestamp::new(77)),
        };
        let prepared = prepare_zero_value(&[Transfer::empty(tag.clone())], &options).unwrap();
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared[0].tag, tag);
        assert_eq!(prepared[0].value, 0);
        assert_eq!(prepared[0].created_at, Timestamp::new(77));
        assert_eq!(prepared[0].address, NULL_ADDRESS);
    }

    #[test]
    fn value_transfers_rejected() {
        let mut transfer = Transfer::empty(Tag::default());
        transfer.value = 10;
        assert!(prepare_zero_value(&[transfer], &PrepareOptions::default()).is_err());
    }

    #[test]
    fn nothing_to_prepare_rejected() {
        assert!(prepare_zero_value(&[], &PrepareOptions::default()).is_err());
    }
}
