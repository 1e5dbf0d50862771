//! Message header handling.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Collection of message headers.
///
/// Header names are case-insensitive and unique: setting a name that already
/// exists replaces its value.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, String>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header value, replacing any existing value for that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or value is empty.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        let value = value.into();

        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("Header name cannot be empty".into()));
        }
        if value.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "Header value cannot be empty".into(),
            ));
        }

        self.headers.insert(name.to_lowercase(), value);
        Ok(())
    }

    /// Gets the value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Removes a header.
    pub fn remove(&mut self, name: &str) {
        self.headers.remove(&name.to_lowercase());
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns an iterator over all headers.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Capitalizes a header name (e.g., "content-type" -> "Content-Type").
pub(crate) fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted_headers: Vec<_> = self.headers.iter().collect();
        sorted_headers.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (name, value) in sorted_headers {
            writeln!(f, "{}: {value}", canonical_name(name))?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_set_get() {
        let mut headers = Headers::new();
        headers.set("X-Priority", "1").unwrap();
        assert_eq!(headers.get("X-Priority"), Some("1"));
        assert_eq!(headers.get("x-priority"), Some("1")); // Case insensitive
    }

    #[test]
    fn test_headers_last_write_wins() {
        let mut headers = Headers::new();
        headers.set("X-Mailer", "first").unwrap();
        headers.set("X-Mailer", "second").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-Mailer"), Some("second"));
    }

    #[test]
    fn test_headers_rejects_empty_name() {
        let mut headers = Headers::new();
        assert!(headers.set("", "value").is_err());
        assert!(headers.set("   ", "value").is_err());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_rejects_empty_value() {
        let mut headers = Headers::new();
        assert!(headers.set("X-Empty", "").is_err());
        assert!(headers.is_empty());
    }

    #[test]
    fn test_headers_remove() {
        let mut headers = Headers::new();
        headers.set("X-Priority", "1").unwrap();
        assert!(headers.get("X-Priority").is_some());

        headers.remove("x-priority");
        assert!(headers.get("X-Priority").is_none());
    }

    #[test]
    fn test_headers_display() {
        let mut headers = Headers::new();
        headers.set("x-priority", "1").unwrap();
        headers.set("x-mailer", "mailwright").unwrap();

        let s = headers.to_string();
        assert!(s.contains("X-Priority: 1"));
        assert!(s.contains("X-Mailer: mailwright"));
    }

    #[test]
    fn test_headers_iter() {
        let mut headers = Headers::new();
        headers.set("X-One", "1").unwrap();
        headers.set("X-Two", "2").unwrap();

        let mut count = 0;
        for (name, value) in headers.iter() {
            assert!(!name.is_empty());
            assert!(!value.is_empty());
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
