use serde::Serialize;
use std::collections::HashMap;

/// Multi-valued request parameters (query string, then form body).
///
/// Readers only ever look at the first value of a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Params(HashMap<String, Vec<String>>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` string.
    #[must_use]
    pub fn from_urlencoded(input: &str) -> Self {
        let mut params = Self::new();
        params.extend_urlencoded(input);
        params
    }

    /// Append the pairs of an urlencoded string after the existing values.
    pub fn extend_urlencoded(&mut self, input: &str) {
        for (k, v) in url::form_urlencoded::parse(input.as_bytes()) {
            self.append(k.into_owned(), v.into_owned());
        }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// First value for `key`, if any.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// First value for `key`, treating an empty string as absent.
    #[must_use]
    pub fn first_non_empty(&self, key: &str) -> Option<&str> {
        self.first(key).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.append(k, v);
        }
        params
    }
}
