//! # mailwright
//!
//! Email composition library: accumulate sender, recipients, headers,
//! content and session configuration, then build an immutable transportable
//! message.
//!
//! ## Features
//!
//! - **Validated addresses**: malformed input fails at the point of
//!   assignment, not at send time
//! - **Build-once composer**: a composer produces exactly one message;
//!   rebuilds are an illegal-state error
//! - **Session resolution**: host, ports, timeouts, credentials and TLS
//!   flags resolve into an opaque session handle on demand
//! - **Pluggable transport**: a narrow [`Transport`] seam keeps the core free
//!   of any mail-transport dependency
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailwright::MailComposer;
//!
//! let mut composer = MailComposer::new();
//! composer.set_host_name("smtp.example.com");
//! composer.set_from("sender@example.com")?;
//! composer.add_to("recipient@example.com")?;
//! composer.set_subject("Greetings");
//! composer.set_content_text("Hello, World!", "text/plain");
//!
//! let message = composer.build()?;
//! println!("{}", message.to_rfc5322());
//! ```
//!
//! ## Session handling
//!
//! ```ignore
//! use mailwright::{MailComposer, Session};
//! use std::time::Duration;
//!
//! let mut composer = MailComposer::new();
//! composer.set_host_name("smtp.example.com");
//! composer.set_authentication("user", "secret");
//! composer.set_start_tls_enabled(true);
//! composer.set_socket_connection_timeout(Duration::from_secs(30));
//!
//! // Resolved lazily and cached:
//! let session = composer.mail_session()?;
//!
//! // Or supplied ready-made by a transport layer, which then owns the host:
//! composer.set_mail_session(Session::new("smtp.example.com", 587));
//! assert!(composer.host_name().is_none());
//! ```
//!
//! ## Modules
//!
//! - [`address`]: validated addresses and mailboxes
//! - [`composer`]: the build-once mail composer
//! - [`content`]: message bodies and content types
//! - [`header`]: case-insensitive unique-key headers
//! - [`message`]: the built message artifact
//! - [`session`]: session configuration and the transport seam

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod composer;
pub mod content;
mod error;
pub mod header;
pub mod message;
pub mod session;

pub use address::{Address, Mailbox};
pub use composer::{ComposeBody, MailComposer, DEFAULT_CHARSET};
pub use content::{Content, ContentType};
pub use error::{Error, Result};
pub use header::Headers;
pub use message::MailMessage;
pub use session::{
    Authentication, PopBeforeSmtp, Session, SessionConfig, Transport, DEFAULT_SMTPS_PORT,
    DEFAULT_SMTP_PORT,
};
