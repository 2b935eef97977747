/// Query parameters for upstream calls
///
/// Backed by a `BTreeMap`, so iteration is always sorted by name no matter
/// the order parameters were added in. Both the request URL and the cache key
/// are built from this ordering.
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; a repeated name replaces the earlier value
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.entries.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Name/value pairs in ascending name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `application/x-www-form-urlencoded` rendering in name order
    pub fn canonical_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.iter() {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_query_ignores_insertion_order() {
        let ab = QueryParams::new().with("a", 1).with("b", 2);
        let ba = QueryParams::new().with("b", 2).with("a", 1);
        assert_eq!(ab, ba);
        assert_eq!(ab.canonical_query(), "a=1&b=2");
        assert_eq!(ba.canonical_query(), "a=1&b=2");
    }

    #[test]
    fn test_values_are_encoded() {
        let params = QueryParams::new().with("q", "apple & co");
        assert_eq!(params.canonical_query(), "q=apple+%26+co");
    }

    #[test]
    fn test_repeated_name_replaces() {
        let params: QueryParams = vec![("symbol", "AAPL"), ("symbol", "MSFT")].into_iter().collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("symbol"), Some("MSFT"));
    }
}
