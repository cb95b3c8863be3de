//! Conversion between raw query strings and ordered key-value data.
//!
//! Decoding and encoding follow the `application/x-www-form-urlencoded` rules,
//! so `'+'` stands for a space and every other byte outside of
//! `ALPHA / DIGIT / "*" / "-" / "." / "_"` is percent-encoded on the way out.

use alloc::{
    string::{String, ToString},
    vec::{self, Vec},
};
use core::slice;

/// Ordered query data with unique keys.
///
/// Keys keep the position at which they were first inserted. Inserting an
/// existing key replaces its value in place, so when a query string repeats a
/// key, the last value wins.
///
/// # Examples
///
/// ```
/// use tidy_uri::query;
///
/// let data = query::decode("tag=networking&order=newest&tag=rust");
/// assert_eq!(data.get("tag"), Some("rust"));
/// assert!(data.iter().map(|(k, _)| k).eq(["tag", "order"]));
/// assert_eq!(query::encode(&data), "tag=rust&order=newest");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct QueryData {
    pairs: Vec<(String, String)>,
}

impl QueryData {
    /// Creates empty query data.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Checks whether there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the value of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.pairs[i].1.as_str())
    }

    /// Checks whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Sets the value of a key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(core::mem::replace(&mut self.pairs[i].1, value)),
            None => {
                self.pairs.push((key, value));
                None
            }
        }
    }

    /// Removes a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.pairs.remove(i).1)
    }

    /// Sorts the keys in ascending byte order.
    pub fn sort(&mut self) {
        self.pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    }

    /// Returns an iterator over the key-value pairs in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.pairs.iter(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.pairs.iter().position(|(k, _)| k == key)
    }
}

/// An iterator over the key-value pairs of [`QueryData`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (String, String)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a QueryData {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for QueryData {
    type Item = (String, String);
    type IntoIter = vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = QueryData::new();
        data.extend(iter);
        data
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryData {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Decodes a raw query string into [`QueryData`].
///
/// A pair without `'='` has an empty value. Empty pairs are skipped.
#[must_use]
pub fn decode(query: &str) -> QueryData {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Encodes [`QueryData`] into a raw query string.
#[must_use]
pub fn encode(data: &QueryData) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(data.iter())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_form_encoding() {
        let data = decode("q=a+b%26c&empty=&flag&&x=%E2%9C%93");
        assert_eq!(data.get("q"), Some("a b&c"));
        assert_eq!(data.get("empty"), Some(""));
        assert_eq!(data.get("flag"), Some(""));
        assert_eq!(data.get("x"), Some("\u{2713}"));
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn later_duplicates_overwrite() {
        let data = decode("a=1&b=2&a=3");
        assert_eq!(data.get("a"), Some("3"));
        assert!(data.iter().eq([("a", "3"), ("b", "2")]));
    }

    #[test]
    fn insert_and_remove() {
        let mut data = QueryData::new();
        assert_eq!(data.insert("lang", "en"), None);
        assert_eq!(data.insert("lang", "de"), Some("en".into()));
        assert!(data.contains_key("lang"));
        assert_eq!(data.remove("lang"), Some("de".into()));
        assert!(data.is_empty());
    }

    #[test]
    fn sort_and_encode() {
        let mut data = decode("lang=en&article=fred");
        data.sort();
        assert_eq!(encode(&data), "article=fred&lang=en");
        assert_eq!(encode(&decode("k=a b")), "k=a+b");
    }
}
