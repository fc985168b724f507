//! Morphological feature list (`Case=Nom|Number=Sing`).
//!
//! Pairs keep the order they were read or inserted in; only [`Features::encode`]
//! sorts, so the written form is canonical no matter how the source ordered them.

use core::fmt;

use crate::fields::SENTINEL;

const PAIR_SEPARATOR: char = '|';
const KEY_VALUE_SEPARATOR: char = '=';

/// An ordered list of `name=value` pairs.
///
/// Equality ignores order: two lists are equal when they hold the same pairs.
#[derive(Debug, Clone, Default, Eq)]
pub struct Features(Vec<(String, String)>);

/// Result of a lenient parse: the pairs that were well formed, plus every
/// segment that was skipped because it did not contain exactly one `=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeatures {
    pub features: Option<Features>,
    pub malformed: Vec<String>,
}

impl Features {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses a FEATS column. `_` yields no features at all.
    pub fn parse(raw: &str) -> ParsedFeatures {
        if raw == SENTINEL {
            return ParsedFeatures::default();
        }

        let mut pairs = Vec::new();
        let mut malformed = Vec::new();
        for segment in raw.split(PAIR_SEPARATOR) {
            let mut parts = segment.split(KEY_VALUE_SEPARATOR);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(key), Some(value), None) => pairs.push((key.to_string(), value.to_string())),
                _ => malformed.push(segment.to_string()),
            }
        }

        ParsedFeatures {
            features: (!pairs.is_empty()).then_some(Self(pairs)),
            malformed,
        }
    }

    /// Writes the canonical FEATS column: pairs sorted by key, or `_` when empty.
    pub fn encode(features: Option<&Features>) -> String {
        match features {
            Some(features) if !features.is_empty() => features.to_string(),
            _ => SENTINEL.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Sets `key`, replacing the value in place if the key is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(core::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let position = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(position).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }

    fn sorted(&self) -> Vec<&(String, String)> {
        let mut pairs: Vec<_> = self.0.iter().collect();
        pairs.sort();
        pairs
    }
}

impl PartialEq for Features {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl From<Vec<(String, String)>> for Features {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Features {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                write!(f, "{PAIR_SEPARATOR}")?;
            }
            write!(f, "{key}{KEY_VALUE_SEPARATOR}{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sentinel_parses_to_nothing() {
        assert_eq!(Features::parse("_"), ParsedFeatures::default());
        assert_eq!(Features::encode(None), "_");
        assert_eq!(Features::encode(Some(&Features::new())), "_");
    }

    #[test]
    fn test_single_pair() {
        let parsed = Features::parse("Case=Nom");
        let features = parsed.features.unwrap();
        assert_eq!(features.get("Case"), Some("Nom"));
        assert!(parsed.malformed.is_empty());
    }

    #[test]
    fn test_encode_sorts_by_key() {
        let features = Features::parse("Number=Sing|Case=Nom").features;
        assert_eq!(Features::encode(features.as_ref()), "Case=Nom|Number=Sing");
    }

    #[test]
    fn test_malformed_pair_is_skipped() {
        let parsed = Features::parse("Case=Nom|BadPair");
        assert_eq!(parsed.malformed, vec!["BadPair".to_string()]);

        let features = parsed.features.unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features.get("Case"), Some("Nom"));
    }

    #[test]
    fn test_more_than_one_equals_is_malformed() {
        let parsed = Features::parse("A=1=2|B=2");
        assert_eq!(parsed.malformed, vec!["A=1=2".to_string()]);
        assert_eq!(Features::encode(parsed.features.as_ref()), "B=2");
    }

    #[test]
    fn test_all_malformed_yields_no_features() {
        let parsed = Features::parse("Foo|Bar");
        assert_eq!(parsed.features, None);
        assert_eq!(parsed.malformed.len(), 2);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut features: Features = [("Case", "Nom"), ("Number", "Sing")].into_iter().collect();
        assert_eq!(features.insert("Case", "Acc"), Some("Nom".to_string()));
        assert_eq!(features.iter().next(), Some(("Case", "Acc")));
        assert_eq!(features.remove("Number"), Some("Sing".to_string()));
        assert_eq!(features.len(), 1);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Features = [("Case", "Nom"), ("Number", "Sing")].into_iter().collect();
        let b: Features = [("Number", "Sing"), ("Case", "Nom")].into_iter().collect();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn test_encoding_is_canonical(pairs in proptest::collection::btree_map("[A-Za-z]{1,8}", "[A-Za-z0-9]{1,6}", 1..6)) {
            let raw: Vec<String> = pairs.iter().rev().map(|(k, v)| format!("{k}={v}")).collect();
            let parsed = Features::parse(&raw.join("|"));
            prop_assert!(parsed.malformed.is_empty());

            let encoded = Features::encode(parsed.features.as_ref());
            let expected: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            prop_assert_eq!(&encoded, &expected.join("|"));

            let reparsed = Features::parse(&encoded).features;
            prop_assert_eq!(reparsed, parsed.features);
        }
    }
}
