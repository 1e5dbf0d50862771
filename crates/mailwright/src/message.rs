//! The built, transportable mail message.

use crate::address::Mailbox;
use crate::content::{Content, ContentType};
use crate::header::Headers;
use crate::session::Session;
use chrono::{DateTime, Utc};

/// Immutable mail message produced by a successful build.
///
/// Carries everything a transport needs: envelope and header recipients in
/// their original insertion order, the resolved [`Session`], and the body.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub(crate) from: Mailbox,
    pub(crate) to: Vec<Mailbox>,
    pub(crate) cc: Vec<Mailbox>,
    pub(crate) bcc: Vec<Mailbox>,
    pub(crate) reply_to: Vec<Mailbox>,
    pub(crate) headers: Headers,
    pub(crate) subject: Option<String>,
    pub(crate) content: Option<Content>,
    pub(crate) content_type: ContentType,
    pub(crate) sent_date: DateTime<Utc>,
    pub(crate) session: Session,
}

impl MailMessage {
    /// Sender address.
    #[must_use]
    pub const fn from_address(&self) -> &Mailbox {
        &self.from
    }

    /// To recipients, in insertion order.
    #[must_use]
    pub fn to(&self) -> &[Mailbox] {
        &self.to
    }

    /// Cc recipients, in insertion order.
    #[must_use]
    pub fn cc(&self) -> &[Mailbox] {
        &self.cc
    }

    /// Bcc recipients, in insertion order.
    #[must_use]
    pub fn bcc(&self) -> &[Mailbox] {
        &self.bcc
    }

    /// Reply-To addresses, in insertion order.
    #[must_use]
    pub fn reply_to(&self) -> &[Mailbox] {
        &self.reply_to
    }

    /// Custom headers recorded on the composer.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Subject line, if set.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Message body, if set.
    #[must_use]
    pub const fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Resolved content type of the body.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Sent date stamped at build time.
    #[must_use]
    pub const fn sent_date(&self) -> DateTime<Utc> {
        self.sent_date
    }

    /// Session the message was composed against.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// All envelope recipients (To, Cc, Bcc), in insertion order.
    #[must_use]
    pub fn all_recipients(&self) -> Vec<&Mailbox> {
        self.to
            .iter()
            .chain(self.cc.iter())
            .chain(self.bcc.iter())
            .collect()
    }

    /// Builds the RFC 5322 formatted message.
    ///
    /// Bcc recipients are envelope-only and never rendered. A
    /// [`Content::Raw`] body is rendered as UTF-8 text, replacing invalid
    /// sequences; transports that need the exact bytes should take them from
    /// [`content`] instead.
    ///
    /// [`content`]: MailMessage::content
    #[must_use]
    pub fn to_rfc5322(&self) -> String {
        use std::fmt::Write;

        let mut message = String::new();

        let _ = writeln!(message, "From: {}\r", self.from);

        if !self.reply_to.is_empty() {
            let _ = writeln!(message, "Reply-To: {}\r", format_list(&self.reply_to));
        }

        let _ = writeln!(message, "To: {}\r", format_list(&self.to));

        if !self.cc.is_empty() {
            let _ = writeln!(message, "Cc: {}\r", format_list(&self.cc));
        }

        if let Some(subject) = &self.subject {
            let _ = writeln!(message, "Subject: {subject}\r");
        }

        let _ = writeln!(message, "Date: {}\r", self.sent_date.to_rfc2822());

        let mut custom: Vec<_> = self.headers.iter().collect();
        custom.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (name, value) in custom {
            let _ = writeln!(message, "{}: {value}\r", crate::header::canonical_name(name));
        }

        message.push_str("MIME-Version: 1.0\r\n");
        let _ = writeln!(message, "Content-Type: {}\r", self.content_type);

        // Empty line between headers and body
        message.push_str("\r\n");

        match &self.content {
            Some(Content::Text { body, .. }) => message.push_str(body),
            Some(Content::Raw(bytes)) => message.push_str(&String::from_utf8_lossy(bytes)),
            None => {}
        }

        message
    }
}

fn format_list(mailboxes: &[Mailbox]) -> String {
    mailboxes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
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
    use chrono::TimeZone;

    fn sample_message() -> MailMessage {
        let mut headers = Headers::new();
        headers.set("X-Priority", "1").unwrap();

        MailMessage {
            from: Mailbox::with_name("Sender", "sender@example.com").unwrap(),
            to: vec![Mailbox::new("to@example.com").unwrap()],
            cc: vec![Mailbox::new("cc@example.com").unwrap()],
            bcc: vec![Mailbox::new("bcc@example.com").unwrap()],
            reply_to: vec![],
            headers,
            subject: Some("Greetings".to_string()),
            content: Some(Content::text("hello", "text/plain")),
            content_type: ContentType::text_plain().with_parameter("charset", "utf-8"),
            sent_date: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            session: Session::new("localhost", 25),
        }
    }

    #[test]
    fn test_to_rfc5322_headers_and_body() {
        let rendered = sample_message().to_rfc5322();

        assert!(rendered.starts_with("From: Sender <sender@example.com>\r\n"));
        assert!(rendered.contains("To: to@example.com\r\n"));
        assert!(rendered.contains("Cc: cc@example.com\r\n"));
        assert!(rendered.contains("Subject: Greetings\r\n"));
        assert!(rendered.contains("Date: Sun, 1 Jun 2025 12:00:00 +0000\r\n"));
        assert!(rendered.contains("X-Priority: 1\r\n"));
        assert!(rendered.contains("MIME-Version: 1.0\r\n"));
        assert!(rendered.contains("Content-Type: text/plain; charset=utf-8\r\n"));
        assert!(rendered.ends_with("\r\nhello"));
    }

    #[test]
    fn test_to_rfc5322_omits_bcc() {
        let rendered = sample_message().to_rfc5322();
        assert!(!rendered.contains("bcc@example.com"));
    }

    #[test]
    fn test_to_rfc5322_raw_body_is_lossy() {
        let mut message = sample_message();
        message.content = Some(Content::Raw(vec![b'h', b'i', 0xFF]));

        let rendered = message.to_rfc5322();
        assert!(rendered.ends_with("hi\u{FFFD}"));
    }

    #[test]
    fn test_all_recipients_order() {
        let message = sample_message();
        let recipients: Vec<&str> = message
            .all_recipients()
            .iter()
            .map(|m| m.address.as_str())
            .collect();
        assert_eq!(
            recipients,
            vec!["to@example.com", "cc@example.com", "bcc@example.com"]
        );
    }
}
