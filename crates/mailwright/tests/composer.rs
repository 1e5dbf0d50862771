//! Integration tests for the mail composer.
//!
//! These exercise the full composer lifecycle against a recording transport
//! double, without any real network connection.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use mailwright::{
    ComposeBody, Error, MailComposer, MailMessage, PopBeforeSmtp, Result, Session, Transport,
};
use std::time::Duration;

/// Transport double that records rendered messages instead of sending them.
#[derive(Debug, Default)]
struct RecordingTransport {
    sent: Vec<String>,
}

impl Transport for RecordingTransport {
    type Error = std::convert::Infallible;

    fn send(&mut self, message: &MailMessage) -> std::result::Result<(), Self::Error> {
        self.sent.push(message.to_rfc5322());
        Ok(())
    }
}

/// Minimal plain-text adapter for the body-composition contract.
struct PlainTextMail(MailComposer);

impl ComposeBody for PlainTextMail {
    fn set_msg(&mut self, msg: &str) -> Result<()> {
        self.0.set_content_text(msg, "text/plain");
        Ok(())
    }
}

#[test]
fn add_cc_yields_first_entry() {
    let mut composer = MailComposer::new();
    composer.add_cc("ccemail@gmail.com").unwrap();

    assert_eq!(
        composer.cc_addresses()[0].address.as_str(),
        "ccemail@gmail.com"
    );
}

#[test]
fn mail_session_with_host_only() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");

    assert!(composer.mail_session().is_ok());
    // Idempotent read: every subsequent call succeeds too.
    assert!(composer.mail_session().is_ok());
}

#[test]
fn mail_session_with_full_configuration() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_authentication("authname", "authpass");
    composer.set_ssl_on_connect(true);
    composer.set_ssl_check_server_identity(true);
    composer.set_bounce_address("bounceemail@gmail.com");
    composer.set_socket_connection_timeout(Duration::from_secs(5));
    composer.set_socket_timeout(Duration::from_secs(2));
    composer.set_start_tls_enabled(true);
    composer.set_start_tls_required(true);
    composer.set_send_partial(true);

    let session = composer.mail_session().unwrap();
    assert_eq!(session.host(), "localhost");
    assert!(session.ssl_on_connect());
    assert!(session.starttls_required());
    assert_eq!(session.bounce_address(), Some("bounceemail@gmail.com"));
}

#[test]
fn mail_session_without_host_fails() {
    let mut composer = MailComposer::new();

    assert!(matches!(composer.mail_session(), Err(Error::MissingHost)));
}

#[test]
fn mail_session_returns_supplied_session() {
    let mut composer = MailComposer::new();
    composer.set_mail_session(Session::new("smtp.example.com", 587));

    let session = composer.mail_session().unwrap();
    assert_eq!(session.host(), "smtp.example.com");
    assert_eq!(session.port(), 587);
}

#[test]
fn set_from_with_name() {
    let mut composer = MailComposer::new();
    composer.set_charset("UTF-16");
    composer
        .set_from_with_name("fromemail@gmail.com", "Set From")
        .unwrap();

    let from = composer.from_address().unwrap();
    assert_eq!(from.address.as_str(), "fromemail@gmail.com");
    assert_eq!(from.name.as_deref(), Some("Set From"));
}

#[test]
fn add_bcc_bulk_preserves_order() {
    let addresses = [
        "bcc1email@gmail.com",
        "bcc2email@gmail.com",
        "bcc3email@gmail.com",
    ];

    let mut composer = MailComposer::new();
    composer.add_bcc_addresses(&addresses).unwrap();

    let stored: Vec<&str> = composer
        .bcc_addresses()
        .iter()
        .map(|m| m.address.as_str())
        .collect();
    assert_eq!(stored, addresses);
}

#[test]
fn add_bcc_empty_list_fails() {
    let mut composer = MailComposer::new();

    assert!(composer.add_bcc_addresses(&[]).is_err());
    assert!(composer.bcc_addresses().is_empty());
}

#[test]
fn add_bcc_with_name() {
    let mut composer = MailComposer::new();
    composer
        .add_bcc_with_name("bccemail@gmail.com", "Blind Copy")
        .unwrap();

    let bcc = &composer.bcc_addresses()[0];
    assert_eq!(bcc.address.as_str(), "bccemail@gmail.com");
    assert_eq!(bcc.name.as_deref(), Some("Blind Copy"));
}

#[test]
fn add_reply_to_with_name() {
    let mut composer = MailComposer::new();
    composer
        .add_reply_to_with_name("replytoemail@gmail.com", "Reply To")
        .unwrap();

    let reply_to = &composer.reply_to_addresses()[0];
    assert_eq!(reply_to.address.as_str(), "replytoemail@gmail.com");
    assert_eq!(reply_to.name.as_deref(), Some("Reply To"));
}

#[test]
fn add_header_valid_and_invalid() {
    let mut composer = MailComposer::new();
    composer.add_header("X-Test-Header", "TestValue").unwrap();
    assert_eq!(composer.headers().get("X-Test-Header"), Some("TestValue"));

    assert!(matches!(
        composer.add_header("", "TestValue"),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        composer.add_header("X-Test-Header", ""),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn add_header_last_write_wins() {
    let mut composer = MailComposer::new();
    composer.add_header("X-Test-Header", "first").unwrap();
    composer.add_header("X-Test-Header", "second").unwrap();

    assert_eq!(composer.headers().get("X-Test-Header"), Some("second"));
}

#[test]
fn build_minimal_then_rebuild_fails() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();
    composer.set_subject("Mail Message Test");

    assert!(composer.build().is_ok());
    assert!(composer.message().is_some());

    // Building a second message on the same composer is illegal, even after
    // further state changes.
    composer.add_to("another@gmail.com").unwrap();
    assert!(matches!(composer.build(), Err(Error::AlreadyBuilt)));
}

#[test]
fn build_with_raw_body() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();
    composer.set_content(mailwright::Content::Raw(b"raw body".to_vec()));

    assert!(composer.build().is_ok());
    assert!(composer.message().is_some());
}

#[test]
fn build_full() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();
    composer.set_charset("UTF-16");
    composer.set_subject("Mail Message Test");
    composer
        .add_cc_addresses(&["cc1email@gmail.com", "cc2email@gmail.com"])
        .unwrap();
    composer.add_bcc("bccemail@gmail.com").unwrap();
    composer.add_reply_to("replyemail@gmail.com").unwrap();
    composer.add_header("X-Test-Header", "TestValue").unwrap();
    composer.set_sent_date(Some(Utc::now()));
    composer.set_content_text("<b>test html</b>", "text/html");
    composer.set_pop_before_smtp(Some(PopBeforeSmtp::new("pop-host", "pop-user", "pop-pass")));

    let message = composer.build().unwrap();
    assert_eq!(message.cc().len(), 2);
    assert_eq!(message.content_type().to_string(), "text/html; charset=UTF-16");
    assert_eq!(
        message.session().pop_before_smtp().map(|p| p.host.as_str()),
        Some("pop-host")
    );
}

#[test]
fn build_with_malformed_content_type_fails() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();
    composer.set_content_text("body", "not-a-mime-type");

    // The underlying content-type failure surfaces as the normalized
    // composition error, with the cause preserved.
    let err = composer.build().unwrap_err();
    assert!(err.is_composition());
    assert!(std::error::Error::source(&err).is_some());
    assert!(composer.message().is_none());
}

#[test]
fn build_without_from_fails() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");

    assert!(composer.build().unwrap_err().is_composition());
}

#[test]
fn build_without_receiver_fails() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();

    assert!(composer.build().unwrap_err().is_composition());
}

#[test]
fn build_without_host_fails_with_composition_error() {
    let mut composer = MailComposer::new();
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();

    let err = composer.build().unwrap_err();
    assert!(err.is_composition());
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn sent_date_explicit_roundtrip() {
    let explicit = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    let mut composer = MailComposer::new();
    composer.set_sent_date(None);
    composer.set_sent_date(Some(explicit));

    assert_eq!(composer.sent_date(), explicit);
}

#[test]
fn sent_date_defaults_to_now() {
    let composer = MailComposer::new();

    let delta = Utc::now() - composer.sent_date();
    assert!(delta.num_seconds().abs() < 5);
}

#[test]
fn sent_date_null_reset_restores_default() {
    let explicit = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    let mut composer = MailComposer::new();
    composer.set_sent_date(Some(explicit));
    composer.set_sent_date(None);

    let delta = Utc::now() - composer.sent_date();
    assert!(delta.num_seconds().abs() < 5);
}

#[test]
fn host_name_roundtrip() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");

    assert_eq!(composer.host_name(), Some("localhost"));
}

#[test]
fn host_name_shadowed_by_supplied_session() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_mail_session(Session::new("smtp.example.com", 25));

    // The supplied session owns the host, so the composer reports none —
    // even though a host was configured earlier.
    assert!(composer.host_name().is_none());
}

#[test]
fn host_name_survives_session_resolution() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");

    // A self-resolved session does not shadow the configured host; only a
    // caller-supplied session does.
    composer.mail_session().unwrap();
    assert_eq!(composer.host_name(), Some("localhost"));
}

#[test]
fn host_name_survives_build() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();

    composer.build().unwrap();
    assert_eq!(composer.host_name(), Some("localhost"));
}

#[test]
fn failed_build_leaves_host_name_visible() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();
    composer.set_content_text("body", "not-a-mime-type");

    assert!(composer.build().is_err());
    assert_eq!(composer.host_name(), Some("localhost"));
}

#[test]
fn host_name_unset() {
    let composer = MailComposer::new();

    assert!(composer.host_name().is_none());
}

#[test]
fn socket_connection_timeout_roundtrip() {
    let mut composer = MailComposer::new();
    composer.set_socket_connection_timeout(Duration::from_secs(5));

    assert_eq!(
        composer.socket_connection_timeout(),
        Some(Duration::from_secs(5))
    );
}

#[test]
fn built_message_reaches_transport() {
    let mut composer = MailComposer::new();
    composer.set_host_name("localhost");
    composer
        .set_from_with_name("testfrom@gmail.com", "Test From")
        .unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();
    composer.set_subject("Transport Test");
    composer.set_content_text("Hello, World!", "text/plain");

    let mut transport = RecordingTransport::default();
    let message = composer.build().unwrap();
    transport.send(message).unwrap();

    assert_eq!(transport.sent.len(), 1);
    let rendered = &transport.sent[0];
    assert!(rendered.starts_with("From: Test From <testfrom@gmail.com>\r\n"));
    assert!(rendered.contains("To: testreceiver@gmail.com\r\n"));
    assert!(rendered.contains("Subject: Transport Test\r\n"));
    assert!(rendered.ends_with("\r\nHello, World!"));
}

#[test]
fn plain_text_adapter_sets_content() {
    let mut mail = PlainTextMail(MailComposer::new());
    mail.set_msg("plain body").unwrap();

    let composer = &mut mail.0;
    composer.set_host_name("localhost");
    composer.set_from("testfrom@gmail.com").unwrap();
    composer.add_to("testreceiver@gmail.com").unwrap();

    let message = composer.build().unwrap();
    assert_eq!(
        message.content(),
        Some(&mailwright::Content::text("plain body", "text/plain"))
    );
    assert_eq!(
        message.content_type().to_string(),
        "text/plain; charset=utf-8"
    );
}
