//! Request parameters and their query-string encoding.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt::Display;

/// String parameters of a single API call.
///
/// Keys are unique and iterate in lexicographic order, so the encoded query
/// string is the same for the same set of parameters.
///
/// # Examples
///
/// ```
/// use vkapi::Params;
///
/// let params = Params::new()
///     .with("user_ids", "1,2")
///     .with("fields", "photo_50");
///
/// assert_eq!(params.encode(), "fields=photo_50&user_ids=1,2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: BTreeMap<String, String>,
}

impl Params {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value for the key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a parameter and returns the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.insert(key.into(), value.into())
    }

    /// Inserts an array-valued parameter as a comma-joined list.
    ///
    /// ```
    /// use vkapi::Params;
    ///
    /// let mut params = Params::new();
    /// params.insert_list("user_ids", [1, 6492, 53083705]);
    /// assert_eq!(params.get("user_ids"), Some("1,6492,53083705"));
    /// ```
    pub fn insert_list<I>(&mut self, key: impl Into<String>, values: I) -> Option<String>
    where
        I: IntoIterator,
        I::Item: Display,
    {
        self.insert(key, join_list(values))
    }

    /// Inserts the parameter only if the key is not present yet.
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert_default(&mut self, key: &str, value: &str) -> bool {
        match self.inner.entry(key.to_string()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value.to_string());
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Joins the parameters into `key=value` pairs separated by `&`.
    ///
    /// Values are not escaped here; see [`crate::request_url::build_url`].
    /// An empty map encodes to an empty string.
    pub fn encode(&self) -> String {
        let mut encoded = String::new();
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                encoded.push('&');
            }
            encoded.push_str(key);
            encoded.push('=');
            encoded.push_str(value);
        }
        encoded
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

/// Joins a sequence of values with commas, the wire form of array parameters.
///
/// ```
/// use vkapi::params::join_list;
///
/// assert_eq!(join_list(["photo_50", "city"]), "photo_50,city");
/// assert_eq!(join_list(Vec::<u64>::new()), "");
/// ```
pub fn join_list<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut joined = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            joined.push(',');
        }
        joined.push_str(&value.to_string());
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_empty() {
        assert_eq!(Params::new().encode(), "");
    }

    #[test]
    fn test_encode_is_sorted_and_deterministic() {
        let params = Params::from([("v", "5.45"), ("count", "500"), ("access_token", "abc")]);

        let first = params.encode();
        assert_eq!(first, "access_token=abc&count=500&v=5.45");
        assert_eq!(params.encode(), first);

        // Insertion order does not matter
        let reversed = Params::from([("access_token", "abc"), ("count", "500"), ("v", "5.45")]);
        assert_eq!(reversed.encode(), first);
    }

    #[test]
    fn test_encode_pair_and_separator_counts() {
        for n in 1..10 {
            let params: Params = (0..n).map(|i| (format!("k{i}"), format!("v{i}"))).collect();
            let encoded = params.encode();
            assert_eq!(encoded.matches('=').count(), n);
            assert_eq!(encoded.matches('&').count(), n - 1);
        }
    }

    #[test]
    fn test_encode_does_not_escape() {
        let params = Params::new().with("q", "hello world");
        assert_eq!(params.encode(), "q=hello world");
    }

    #[test]
    fn test_encode_does_not_mutate() {
        let params = Params::new().with("a", "1");
        let before = params.clone();
        let _ = params.encode();
        assert_eq!(params, before);
    }

    #[test]
    fn test_insert_default_keeps_existing_value() {
        let mut params = Params::new().with("v", "5.131");
        assert!(!params.insert_default("v", "5.45"));
        assert_eq!(params.get("v"), Some("5.131"));

        assert!(params.insert_default("lang", "en"));
        assert_eq!(params.get("lang"), Some("en"));
    }

    #[test]
    fn test_insert_list() {
        let mut params = Params::new();
        params.insert_list("fields", ["sex", "bdate", "city"]);
        assert_eq!(params.get("fields"), Some("sex,bdate,city"));

        params.insert_list("user_ids", Vec::<i64>::new());
        assert_eq!(params.get("user_ids"), Some(""));
    }
}
