use core::fmt;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use crate::error::ModelError;

macro_rules! define_handle {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
        #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
        #[archive(check_bytes)]
        #[repr(transparent)] // Same layout as u32
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self(index)
            }
        }

        impl From<$name> for u32 {
            fn from(handle: $name) -> u32 {
                handle.0
            }
        }
    };
}

define_handle!(TokenHandle, "Position of a token inside its owning sentence's token arena.");

/// Textual identifier of a token line.
///
/// Either a bare number (`"7"`), an ordinary syntactic word, or a range
/// (`"4-5"`), a multiword span that overlays the words it covers. The raw
/// digits are kept as written so that serialization reproduces them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(String);

impl TokenId {
    /// Validates `raw` against `^\d+(-\d+)?$`.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        if is_token_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ModelError::InvalidTokenId { id: raw.to_string() })
        }
    }

    pub fn word(position: u32) -> Self {
        Self(position.to_string())
    }

    pub fn span(first: u32, last: u32) -> Self {
        Self(format!("{first}-{last}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `N-M` span markers, which never take part in the dependency tree.
    pub fn is_multiword(&self) -> bool {
        self.0.contains('-')
    }

    /// The `(first, last)` word positions covered by a multiword span.
    pub fn range(&self) -> Option<(u64, u64)> {
        let (first, last) = self.0.split_once('-')?;
        Some((first.parse().ok()?, last.parse().ok()?))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_token_id(raw: &str) -> bool {
    match raw.split_once('-') {
        Some((first, last)) => is_digits(first) && is_digits(last),
        None => is_digits(raw),
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TokenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::borrow::Borrow<str> for TokenId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for TokenId {
    type Error = ModelError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl core::str::FromStr for TokenId {
    type Err = ModelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_words_and_spans() {
        assert!(!TokenId::parse("1").unwrap().is_multiword());
        assert!(!TokenId::parse("012").unwrap().is_multiword());

        let span = TokenId::parse("4-5").unwrap();
        assert!(span.is_multiword());
        assert_eq!(span.range(), Some((4, 5)));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        for raw in ["", "abc", "1-", "-1", "1-2-3", "1.1", " 1", "1a", "٣"] {
            assert!(TokenId::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_keeps_digits_verbatim() {
        assert_eq!(TokenId::parse("007").unwrap().as_str(), "007");
        assert_eq!(TokenId::span(3, 4).as_str(), "3-4");
        assert_eq!(TokenId::word(9).to_string(), "9");
    }

    #[test]
    fn test_handle_layout() {
        assert_eq!(core::mem::size_of::<TokenHandle>(), 4);
        assert_eq!(TokenHandle::new(3).index(), 3);
    }
}
