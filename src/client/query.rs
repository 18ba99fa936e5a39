//! Query string construction.

use std::collections::BTreeMap;
use std::fmt::Display;
use url::form_urlencoded;

/// Ordered query parameters. Keys are kept sorted so serialization is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert that skips `None`.
    pub fn with_opt<V: Display>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        self.pairs.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    /// Copy every pair from `other`, overwriting duplicates.
    pub fn extend(&mut self, other: &QueryParams) {
        for (k, v) in &other.pairs {
            self.pairs.insert(k.clone(), v.clone());
        }
    }

    /// Merge pairs from an encoded query string such as `a=1&b=2`.
    pub fn extend_from_query_string(&mut self, qs: &str) {
        for (k, v) in form_urlencoded::parse(qs.as_bytes()) {
            self.pairs.insert(k.into_owned(), v.into_owned());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Percent-encoded `k=v&...` in key order.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_and_order() {
        let q = QueryParams::new()
            .with("start_point", "Posta Mpya")
            .with("end_point", "Mbezi & Kimara")
            .with_opt::<u32>("page", None)
            .with_opt("limit", Some(20));
        assert_eq!(
            q.to_query_string(),
            "end_point=Mbezi+%26+Kimara&limit=20&start_point=Posta+Mpya"
        );
        assert_eq!(q.len(), 3);
        assert_eq!(q.get("limit"), Some("20"));
    }

    #[test]
    fn test_parse_roundtrip_merge() {
        let mut q = QueryParams::new().with("status", "confirmed");
        q.extend_from_query_string("page=2&status=cancelled");
        assert_eq!(q.get("status"), Some("cancelled"));
        assert_eq!(q.get("page"), Some("2"));
    }
}
