//! Record tags.
//!
//! A tag is at most [`Tag::MAX_LEN`] characters from the tryte alphabet
//! (`A`-`Z` and `9`). Shorter tags are right-padded with `9` on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(String);

impl Tag {
    pub const MAX_LEN: usize = 27;

    pub fn new(tag: impl Into<String>) -> Result<Self, TypesError> {
        let tag = tag.into();
        if tag.len() > Self::MAX_LEN {
            return Err(TypesError::InvalidTag {
                tag,
                reason: "longer than 27 characters",
            });
        }
        if !tag.bytes().all(|b| b == b'9' || b.is_ascii_uppercase()) {
            return Err(TypesError::InvalidTag {
                tag,
                reason: "only A-Z and 9 are allowed",
            });
        }
        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The tag right-padded with `9` to its full width.
    pub fn padded(&self) -> String {
        format!("{:9<width$}", self.0, width = Self::MAX_LEN)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
