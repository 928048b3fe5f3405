//! Request-scoped path parameters.

use std::collections::HashMap;

use serde::Serialize;

/// Parameters captured while matching a request path.
///
/// Keys are unique; inserting an existing name overwrites the earlier capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params {
    inner: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a capture, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rewrite every value in place.
    pub fn map_values(&mut self, mut f: impl FnMut(&str) -> String) {
        for value in self.inner.values_mut() {
            *value = f(value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_capture_overwrites() {
        let mut params = Params::new();
        assert_eq!(params.insert("id", "1"), None);
        assert_eq!(params.insert("id", "2"), Some("1".to_string()));
        assert_eq!(params.get("id"), Some("2"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let params: Params = [("user", "gordon")].into_iter().collect();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({ "user": "gordon" }));
    }
}
