//! Sentinel-aware scalar field codec.
//!
//! An absent optional value is written as a single underscore. Nothing else
//! is normalized: no trimming, no case folding, and the empty string stays a
//! present (empty) value.

pub const SENTINEL: &str = "_";

pub fn decode(raw: &str) -> Option<String> {
    if raw == SENTINEL {
        None
    } else {
        Some(raw.to_string())
    }
}

pub fn encode(value: Option<&str>) -> &str {
    value.unwrap_or(SENTINEL)
}
