//! The mail composer: accumulates configuration, builds once.

use crate::address::Mailbox;
use crate::content::{Content, ContentType};
use crate::error::{Error, Result};
use crate::header::Headers;
use crate::message::MailMessage;
use crate::session::{Authentication, PopBeforeSmtp, Session, SessionConfig, DEFAULT_SMTP_PORT};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default charset for textual content.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Capability contract for mail flavors that render a caller-supplied body
/// into composer content (plain text, HTML, alternative parts, ...).
///
/// Concrete flavors wrap a [`MailComposer`] and decide how `msg` becomes
/// [`Content`].
pub trait ComposeBody {
    /// Renders `msg` and stores it as the message content.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be rendered or stored.
    fn set_msg(&mut self, msg: &str) -> Result<()>;
}

/// Accumulates message and session configuration through mutator calls and
/// produces an immutable [`MailMessage`] on a single terminal [`build`].
///
/// A composer is created fresh per message. Mutators may run in any order
/// before the build; [`build`] validates accumulated state, transitions the
/// composer to its terminal built state, and any later build attempt fails
/// with [`Error::AlreadyBuilt`].
///
/// [`build`]: MailComposer::build
#[derive(Debug, Default)]
pub struct MailComposer {
    from: Option<Mailbox>,
    to: Vec<Mailbox>,
    cc: Vec<Mailbox>,
    bcc: Vec<Mailbox>,
    reply_to: Vec<Mailbox>,
    headers: Headers,
    subject: Option<String>,
    charset: Option<String>,
    content: Option<Content>,
    sent_date: Option<DateTime<Utc>>,
    config: SessionConfig,
    session: Option<Session>,
    session_supplied: bool,
    message: Option<MailMessage>,
}

impl MailComposer {
    /// Creates an empty composer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- sender and recipients ---

    /// Sets the sender address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn set_from(&mut self, address: &str) -> Result<&mut Self> {
        self.from = Some(Mailbox::new(address)?);
        Ok(self)
    }

    /// Sets the sender address with a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn set_from_with_name(&mut self, address: &str, name: &str) -> Result<&mut Self> {
        self.from = Some(Mailbox::with_name(name, address)?);
        Ok(self)
    }

    /// Appends a To recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_to(&mut self, address: &str) -> Result<&mut Self> {
        self.to.push(Mailbox::new(address)?);
        Ok(self)
    }

    /// Appends a To recipient with a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_to_with_name(&mut self, address: &str, name: &str) -> Result<&mut Self> {
        self.to.push(Mailbox::with_name(name, address)?);
        Ok(self)
    }

    /// Appends several To recipients, in slice order.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is empty or any address is invalid;
    /// nothing is appended on failure.
    pub fn add_to_addresses(&mut self, addresses: &[&str]) -> Result<&mut Self> {
        let parsed = Self::parse_list(addresses)?;
        self.to.extend(parsed);
        Ok(self)
    }

    /// Appends a Cc recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_cc(&mut self, address: &str) -> Result<&mut Self> {
        self.cc.push(Mailbox::new(address)?);
        Ok(self)
    }

    /// Appends a Cc recipient with a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_cc_with_name(&mut self, address: &str, name: &str) -> Result<&mut Self> {
        self.cc.push(Mailbox::with_name(name, address)?);
        Ok(self)
    }

    /// Appends several Cc recipients, in slice order.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is empty or any address is invalid;
    /// nothing is appended on failure.
    pub fn add_cc_addresses(&mut self, addresses: &[&str]) -> Result<&mut Self> {
        let parsed = Self::parse_list(addresses)?;
        self.cc.extend(parsed);
        Ok(self)
    }

    /// Appends a Bcc recipient.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_bcc(&mut self, address: &str) -> Result<&mut Self> {
        self.bcc.push(Mailbox::new(address)?);
        Ok(self)
    }

    /// Appends a Bcc recipient with a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_bcc_with_name(&mut self, address: &str, name: &str) -> Result<&mut Self> {
        self.bcc.push(Mailbox::with_name(name, address)?);
        Ok(self)
    }

    /// Appends several Bcc recipients, in slice order.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is empty or any address is invalid;
    /// nothing is appended on failure.
    pub fn add_bcc_addresses(&mut self, addresses: &[&str]) -> Result<&mut Self> {
        let parsed = Self::parse_list(addresses)?;
        self.bcc.extend(parsed);
        Ok(self)
    }

    /// Appends a Reply-To address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_reply_to(&mut self, address: &str) -> Result<&mut Self> {
        self.reply_to.push(Mailbox::new(address)?);
        Ok(self)
    }

    /// Appends a Reply-To address with a display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid.
    pub fn add_reply_to_with_name(&mut self, address: &str, name: &str) -> Result<&mut Self> {
        self.reply_to.push(Mailbox::with_name(name, address)?);
        Ok(self)
    }

    /// Appends several Reply-To addresses, in slice order.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is empty or any address is invalid;
    /// nothing is appended on failure.
    pub fn add_reply_to_addresses(&mut self, addresses: &[&str]) -> Result<&mut Self> {
        let parsed = Self::parse_list(addresses)?;
        self.reply_to.extend(parsed);
        Ok(self)
    }

    /// Validates a whole address list before any of it is kept.
    fn parse_list(addresses: &[&str]) -> Result<Vec<Mailbox>> {
        if addresses.is_empty() {
            return Err(Error::InvalidArgument(
                "At least one address is required".into(),
            ));
        }
        addresses.iter().map(|addr| Mailbox::new(*addr)).collect()
    }

    // --- headers, subject, content ---

    /// Records a custom header; the last value per name wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or value is empty.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.headers.set(name, value)?;
        Ok(self)
    }

    /// Sets the subject line.
    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the charset applied to textual content without an explicit one.
    pub fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = Some(charset.into());
        self
    }

    /// Stores the message body; the last `set_content*` call wins.
    pub fn set_content(&mut self, content: Content) -> &mut Self {
        self.content = Some(content);
        self
    }

    /// Stores a textual body with a declared MIME type; the last
    /// `set_content*` call wins.
    pub fn set_content_text(
        &mut self,
        body: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> &mut Self {
        self.content = Some(Content::text(body, mime_type));
        self
    }

    /// Sets the sent date, or restores the default-to-now behavior when
    /// `None` is passed.
    pub fn set_sent_date(&mut self, date: Option<DateTime<Utc>>) -> &mut Self {
        self.sent_date = date;
        self
    }

    // --- session configuration ---

    /// Sets the SMTP server host.
    pub fn set_host_name(&mut self, host: impl Into<String>) -> &mut Self {
        self.config.host = Some(host.into());
        self
    }

    /// Sets the SMTP port used for plaintext/STARTTLS connections.
    pub fn set_smtp_port(&mut self, port: u16) -> &mut Self {
        self.config.smtp_port = Some(port);
        self
    }

    /// Sets the SMTP port used for SSL-on-connect connections.
    pub fn set_ssl_smtp_port(&mut self, port: u16) -> &mut Self {
        self.config.ssl_smtp_port = Some(port);
        self
    }

    /// Sets authentication credentials.
    pub fn set_authentication(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> &mut Self {
        self.config.authentication = Some(Authentication::new(username, password));
        self
    }

    /// Enables or disables SSL from the start of the connection.
    pub fn set_ssl_on_connect(&mut self, enabled: bool) -> &mut Self {
        self.config.ssl_on_connect = enabled;
        self
    }

    /// Enables or disables server certificate identity verification.
    pub fn set_ssl_check_server_identity(&mut self, enabled: bool) -> &mut Self {
        self.config.ssl_check_server_identity = enabled;
        self
    }

    /// Sets the bounce (envelope-from) address.
    pub fn set_bounce_address(&mut self, address: impl Into<String>) -> &mut Self {
        self.config.bounce_address = Some(address.into());
        self
    }

    /// Sets the socket connection timeout.
    pub fn set_socket_connection_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Sets the socket read timeout.
    pub fn set_socket_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.config.io_timeout = Some(timeout);
        self
    }

    /// Enables or disables STARTTLS.
    pub fn set_start_tls_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.starttls_enabled = enabled;
        self
    }

    /// Requires STARTTLS (or not).
    pub fn set_start_tls_required(&mut self, required: bool) -> &mut Self {
        self.config.starttls_required = required;
        self
    }

    /// Allows or forbids partial delivery when some recipients are rejected.
    pub fn set_send_partial(&mut self, enabled: bool) -> &mut Self {
        self.config.send_partial = enabled;
        self
    }

    /// Enables or disables transport-level debug output.
    pub fn set_debug(&mut self, enabled: bool) -> &mut Self {
        self.config.debug = enabled;
        self
    }

    /// Sets or clears POP-before-SMTP authorization parameters.
    pub fn set_pop_before_smtp(&mut self, pop: Option<PopBeforeSmtp>) -> &mut Self {
        self.config.pop_before_smtp = pop;
        self
    }

    /// Supplies a pre-built session, bypassing host-based construction.
    ///
    /// Afterwards [`host_name`] returns `None`: the host belongs to the
    /// supplied session, not to the composer.
    ///
    /// [`host_name`]: MailComposer::host_name
    pub fn set_mail_session(&mut self, session: Session) -> &mut Self {
        self.session = Some(session);
        self.session_supplied = true;
        self
    }

    /// Returns the existing session, or resolves one from the accumulated
    /// configuration and caches it for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHost`] if no host was ever set and no session
    /// was supplied.
    pub fn mail_session(&mut self) -> Result<&Session> {
        if self.session.is_none() {
            self.session = Some(self.config.resolve()?);
        }
        self.session.as_ref().ok_or(Error::MissingHost)
    }

    // --- getters ---

    /// Sender address, if set.
    #[must_use]
    pub const fn from_address(&self) -> Option<&Mailbox> {
        self.from.as_ref()
    }

    /// To recipients, in insertion order.
    #[must_use]
    pub fn to_addresses(&self) -> &[Mailbox] {
        &self.to
    }

    /// Cc recipients, in insertion order.
    #[must_use]
    pub fn cc_addresses(&self) -> &[Mailbox] {
        &self.cc
    }

    /// Bcc recipients, in insertion order.
    #[must_use]
    pub fn bcc_addresses(&self) -> &[Mailbox] {
        &self.bcc
    }

    /// Reply-To addresses, in insertion order.
    #[must_use]
    pub fn reply_to_addresses(&self) -> &[Mailbox] {
        &self.reply_to
    }

    /// Custom headers recorded so far.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Subject line, if set.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Charset applied to textual content, defaulting to `utf-8`.
    #[must_use]
    pub fn charset(&self) -> &str {
        self.charset.as_deref().unwrap_or(DEFAULT_CHARSET)
    }

    /// Configured host name.
    ///
    /// Returns `None` once a pre-built session has been supplied, even if a
    /// host was set earlier: the supplied session owns the host. Sessions
    /// the composer resolves itself do not shadow the host.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        if self.session_supplied {
            return None;
        }
        self.config.host.as_deref()
    }

    /// Configured SMTP port, defaulting to 25.
    #[must_use]
    pub fn smtp_port(&self) -> u16 {
        self.config.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
    }

    /// Configured socket connection timeout, if any.
    #[must_use]
    pub const fn socket_connection_timeout(&self) -> Option<Duration> {
        self.config.connect_timeout
    }

    /// Configured socket read timeout, if any.
    #[must_use]
    pub const fn socket_timeout(&self) -> Option<Duration> {
        self.config.io_timeout
    }

    /// The explicit sent date, or "now" when none was set.
    #[must_use]
    pub fn sent_date(&self) -> DateTime<Utc> {
        self.sent_date.unwrap_or_else(Utc::now)
    }

    /// The built message, or `None` before a successful build.
    #[must_use]
    pub const fn message(&self) -> Option<&MailMessage> {
        self.message.as_ref()
    }

    // --- build ---

    /// Validates accumulated state and produces the immutable message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyBuilt`] on a second call, and a composition
    /// error when the sender is unset, no To recipient was added, or the
    /// underlying session/content construction fails (the original cause is
    /// preserved as the error source).
    pub fn build(&mut self) -> Result<&MailMessage> {
        if self.message.is_some() {
            return Err(Error::AlreadyBuilt);
        }

        let from = self
            .from
            .clone()
            .ok_or_else(|| Error::composition("no sender address"))?;

        if self.to.is_empty() {
            return Err(Error::composition("at least one To recipient is required"));
        }

        // Nothing observable is cached until the whole build succeeds.
        let session = match &self.session {
            Some(session) => session.clone(),
            None => self
                .config
                .resolve()
                .map_err(|e| Error::composition_from("could not resolve mail session", e))?,
        };

        let content_type = self
            .resolved_content_type()
            .map_err(|e| Error::composition_from("invalid message content", e))?;

        let sent_date = self.sent_date.unwrap_or_else(Utc::now);

        tracing::debug!(
            to = self.to.len(),
            cc = self.cc.len(),
            bcc = self.bcc.len(),
            subject = self.subject.as_deref().unwrap_or(""),
            "built mail message"
        );

        let message = MailMessage {
            from,
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: self.bcc.clone(),
            reply_to: self.reply_to.clone(),
            headers: self.headers.clone(),
            subject: self.subject.clone(),
            content: self.content.clone(),
            content_type,
            sent_date,
            session,
        };

        Ok(self.message.insert(message))
    }

    /// Parses the declared MIME type of the stored content, applying the
    /// composer charset when the type carries none.
    fn resolved_content_type(&self) -> Result<ContentType> {
        match &self.content {
            Some(Content::Text { mime_type, .. }) => {
                let ct = ContentType::parse(mime_type)?;
                if ct.charset().is_none() {
                    Ok(ct.with_parameter("charset", self.charset()))
                } else {
                    Ok(ct)
                }
            }
            Some(Content::Raw(_)) | None => {
                Ok(ContentType::text_plain().with_parameter("charset", self.charset()))
            }
        }
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
    fn test_add_to_preserves_order() {
        let mut composer = MailComposer::new();
        composer.add_to("first@example.com").unwrap();
        composer.add_to("second@example.com").unwrap();

        let addresses: Vec<&str> = composer
            .to_addresses()
            .iter()
            .map(|m| m.address.as_str())
            .collect();
        assert_eq!(addresses, vec!["first@example.com", "second@example.com"]);
    }

    #[test]
    fn test_bulk_add_no_partial_mutation() {
        let mut composer = MailComposer::new();
        let result = composer.add_cc_addresses(&["ok@example.com", "broken"]);

        assert!(result.is_err());
        assert!(composer.cc_addresses().is_empty());
    }

    #[test]
    fn test_invalid_from_rejected() {
        let mut composer = MailComposer::new();
        assert!(matches!(
            composer.set_from("not-an-address"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(composer.from_address().is_none());
    }

    #[test]
    fn test_charset_defaults() {
        let mut composer = MailComposer::new();
        assert_eq!(composer.charset(), "utf-8");

        composer.set_charset("UTF-16");
        assert_eq!(composer.charset(), "UTF-16");
    }

    #[test]
    fn test_content_last_write_wins() {
        let mut composer = MailComposer::new();
        composer.set_content(Content::Raw(b"raw".to_vec()));
        composer.set_content_text("<b>html</b>", "text/html");

        assert_eq!(
            composer.content,
            Some(Content::text("<b>html</b>", "text/html"))
        );
    }

    #[test]
    fn test_resolved_content_type_applies_charset() {
        let mut composer = MailComposer::new();
        composer.set_charset("UTF-16");
        composer.set_content_text("body", "text/html");

        let ct = composer.resolved_content_type().unwrap();
        assert_eq!(ct.to_string(), "text/html; charset=UTF-16");
    }

    #[test]
    fn test_resolved_content_type_keeps_explicit_charset() {
        let mut composer = MailComposer::new();
        composer.set_charset("UTF-16");
        composer.set_content_text("body", "text/html; charset=us-ascii");

        let ct = composer.resolved_content_type().unwrap();
        assert_eq!(ct.charset(), Some("us-ascii"));
    }

    #[test]
    fn test_smtp_port_default() {
        let composer = MailComposer::new();
        assert_eq!(composer.smtp_port(), 25);
    }
}
