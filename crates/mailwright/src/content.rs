//! Message content and content type handling.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Message body supplied to the composer.
///
/// The last `set_content*` call on the composer wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Pre-encoded body handed over to the transport as-is.
    ///
    /// Transports that need byte fidelity should read these bytes directly;
    /// the textual rendering in [`MailMessage::to_rfc5322`] is lossy for
    /// non-UTF-8 data.
    ///
    /// [`MailMessage::to_rfc5322`]: crate::MailMessage::to_rfc5322
    Raw(Vec<u8>),
    /// Textual body with a declared MIME type (e.g. `text/html`).
    ///
    /// The MIME type is parsed at build time; a malformed type fails the
    /// build with a composition error.
    Text {
        /// Body text.
        body: String,
        /// Declared MIME type.
        mime_type: String,
    },
}

impl Content {
    /// Creates a textual body with a declared MIME type.
    #[must_use]
    pub fn text(body: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::Text {
            body: body.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// MIME content type with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html").
    pub sub_type: String,
    /// Parameters (e.g., charset=utf-8).
    pub parameters: HashMap<String, String>,
}

impl ContentType {
    /// Creates a new content type.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: HashMap::new(),
        }
    }

    /// Creates a text/plain content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Returns the charset parameter if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameters.get("charset").map(String::as_str)
    }

    /// Parses a content type string.
    ///
    /// Format: `type/subtype; param1=value1; param2=value2`
    ///
    /// # Errors
    ///
    /// Returns an error if the format is invalid.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split(';');

        let type_str = parts
            .next()
            .ok_or_else(|| Error::InvalidContentType("Empty content type".to_string()))?
            .trim();

        let Some((main_type, sub_type)) = type_str.split_once('/') else {
            return Err(Error::InvalidContentType(format!(
                "Missing subtype in '{s}'"
            )));
        };

        let main_type = main_type.trim();
        let sub_type = sub_type.trim();
        if main_type.is_empty() || sub_type.is_empty() {
            return Err(Error::InvalidContentType(format!(
                "Empty type or subtype in '{s}'"
            )));
        }

        let mut ct = Self::new(main_type.to_lowercase(), sub_type.to_lowercase());

        for param in parts {
            let param = param.trim();
            if param.is_empty() {
                continue;
            }
            let Some((key, value)) = param.split_once('=') else {
                return Err(Error::InvalidContentType(format!(
                    "Malformed parameter '{param}'"
                )));
            };
            let value = value.trim().trim_matches('"');
            ct.parameters
                .insert(key.trim().to_lowercase(), value.to_string());
        }

        Ok(ct)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        let mut sorted_params: Vec<_> = self.parameters.iter().collect();
        sorted_params.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (key, value) in sorted_params {
            write!(f, "; {key}={value}")?;
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
    fn test_parse_simple() {
        let ct = ContentType::parse("text/html").unwrap();
        assert_eq!(ct.main_type, "text");
        assert_eq!(ct.sub_type, "html");
        assert!(ct.parameters.is_empty());
    }

    #[test]
    fn test_parse_with_charset() {
        let ct = ContentType::parse("text/plain; charset=utf-8").unwrap();
        assert_eq!(ct.charset(), Some("utf-8"));
    }

    #[test]
    fn test_parse_quoted_parameter() {
        let ct = ContentType::parse("text/plain; charset=\"UTF-16\"").unwrap();
        assert_eq!(ct.charset(), Some("UTF-16"));
    }

    #[test]
    fn test_parse_missing_subtype() {
        assert!(ContentType::parse("text").is_err());
        assert!(ContentType::parse("text/").is_err());
        assert!(ContentType::parse("/plain").is_err());
    }

    #[test]
    fn test_parse_malformed_parameter() {
        assert!(ContentType::parse("text/plain; charset").is_err());
    }

    #[test]
    fn test_display() {
        let ct = ContentType::text_plain().with_parameter("charset", "utf-8");
        assert_eq!(ct.to_string(), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_content_text() {
        let content = Content::text("<b>hi</b>", "text/html");
        assert_eq!(
            content,
            Content::Text {
                body: "<b>hi</b>".to_string(),
                mime_type: "text/html".to_string(),
            }
        );
    }
}
