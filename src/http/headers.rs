//! HTTP header map with case-insensitive name lookup.
//!
//! Names are compared case-insensitively and insertion order is preserved,
//! per RFC 9110 §5. Two write operations exist because middleware needs
//! both: [`Headers::append`] keeps prior values (multi-value fields like
//! `Set-Cookie`), while [`Headers::set`] replaces them (policy fields like
//! `Cache-Control`, where exactly one value must win).

use std::fmt;

/// A case-insensitive, order-preserving HTTP header map.
///
/// # Examples
///
/// ```
/// use cdnify::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.append("Cache-Control", "no-store");
/// headers.set("Cache-Control", "public, max-age=604800");
///
/// // `set` replaced the earlier value instead of adding a second one.
/// let all: Vec<_> = headers.get_all("cache-control").collect();
/// assert_eq!(all, vec!["public, max-age=604800"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an entry, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Sets a header, removing every existing value for the same name first.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.entries.push((name, value.into()));
    }

    /// Returns the first value for `name` (case-insensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns all values for `name` (case-insensitive), in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes every entry named `name`. Returns `true` if any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.entries.len() < before
    }

    /// Returns `true` if at least one entry named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Total number of entries (not unique names).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut h = Headers::new();
        h.append("Cache-Control", "public, max-age=60");
        assert_eq!(h.get("cache-control"), Some("public, max-age=60"));
        assert_eq!(h.get("CACHE-CONTROL"), Some("public, max-age=60"));
    }

    #[test]
    fn append_keeps_prior_values() {
        let mut h = Headers::new();
        h.append("Set-Cookie", "a=1");
        h.append("Set-Cookie", "b=2");
        let vals: Vec<_> = h.get_all("set-cookie").collect();
        assert_eq!(vals, vec!["a=1", "b=2"]);
    }

    #[test]
    fn set_replaces_all_prior_values() {
        let mut h = Headers::new();
        h.append("Cache-Control", "no-store");
        h.append("cache-control", "private");
        h.set("Cache-Control", "public, max-age=3600");
        let vals: Vec<_> = h.get_all("cache-control").collect();
        assert_eq!(vals, vec!["public, max-age=3600"]);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn set_on_absent_name_inserts() {
        let mut h = Headers::new();
        h.set("Cache-Control", "public, max-age=60");
        assert_eq!(h.get("cache-control"), Some("public, max-age=60"));
    }

    #[test]
    fn remove_is_case_insensitive() {
        let mut h = Headers::new();
        h.append("X-Foo", "bar");
        h.append("x-foo", "baz");
        assert!(h.remove("X-FOO"));
        assert!(h.is_empty());
        assert!(!h.remove("x-foo"));
    }

    #[test]
    fn wire_format() {
        let mut h = Headers::new();
        h.append("Content-Type", "text/css");
        h.append("Cache-Control", "public, max-age=60");
        assert_eq!(
            h.to_string(),
            "Content-Type: text/css\r\nCache-Control: public, max-age=60\r\n"
        );
    }
}
