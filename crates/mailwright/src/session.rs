//! Mail session configuration and the transport seam.

use crate::error::{Error, Result};
use crate::message::MailMessage;
use std::time::Duration;

/// Default SMTP port for plaintext/STARTTLS connections.
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Default SMTP port for SSL-on-connect connections.
pub const DEFAULT_SMTPS_PORT: u16 = 465;

/// Username/password credentials for SMTP authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl Authentication {
    /// Creates new credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// POP-before-SMTP authorization parameters.
///
/// Carried as opaque pass-through values for transports that still use this
/// scheme; this crate never opens the POP connection itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopBeforeSmtp {
    /// POP3 server host.
    pub host: String,
    /// POP3 username.
    pub username: String,
    /// POP3 password.
    pub password: String,
}

impl PopBeforeSmtp {
    /// Creates POP-before-SMTP parameters.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Accumulated connection settings, resolved into a [`Session`] on demand.
///
/// All fields are recorded as given; structural validation happens in
/// [`SessionConfig::resolve`], reachability is the transport's problem.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// SMTP server host.
    pub host: Option<String>,
    /// SMTP port (defaults to 25 when unset).
    pub smtp_port: Option<u16>,
    /// SMTP port for SSL-on-connect (defaults to 465 when unset).
    pub ssl_smtp_port: Option<u16>,
    /// Socket connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Socket read timeout.
    pub io_timeout: Option<Duration>,
    /// Authentication credentials.
    pub authentication: Option<Authentication>,
    /// Use SSL from the start of the connection.
    pub ssl_on_connect: bool,
    /// Verify the server certificate identity.
    pub ssl_check_server_identity: bool,
    /// Offer STARTTLS after connecting.
    pub starttls_enabled: bool,
    /// Require STARTTLS; abort if the server does not support it.
    pub starttls_required: bool,
    /// Allow partial delivery when some recipients are rejected.
    pub send_partial: bool,
    /// Bounce (envelope-from) address.
    pub bounce_address: Option<String>,
    /// Enable transport-level debug output.
    pub debug: bool,
    /// POP-before-SMTP authorization parameters.
    pub pop_before_smtp: Option<PopBeforeSmtp>,
}

impl SessionConfig {
    /// Resolves the accumulated settings into a session handle.
    ///
    /// The effective port is the SSL port when SSL-on-connect is set and the
    /// plain SMTP port otherwise, each falling back to its standard default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingHost`] if no host name was configured.
    pub fn resolve(&self) -> Result<Session> {
        let host = match self.host.as_deref() {
            Some(host) if !host.trim().is_empty() => host.to_string(),
            _ => return Err(Error::MissingHost),
        };

        let port = if self.ssl_on_connect {
            self.ssl_smtp_port.unwrap_or(DEFAULT_SMTPS_PORT)
        } else {
            self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
        };

        tracing::debug!(host = %host, port, "resolved mail session");

        Ok(Session {
            host,
            port,
            connect_timeout: self.connect_timeout,
            io_timeout: self.io_timeout,
            authentication: self.authentication.clone(),
            ssl_on_connect: self.ssl_on_connect,
            ssl_check_server_identity: self.ssl_check_server_identity,
            starttls_enabled: self.starttls_enabled,
            starttls_required: self.starttls_required,
            send_partial: self.send_partial,
            bounce_address: self.bounce_address.clone(),
            debug: self.debug,
            pop_before_smtp: self.pop_before_smtp.clone(),
        })
    }
}

/// Opaque handle of resolved transport connection parameters.
///
/// Produced from a [`SessionConfig`], or built directly by a transport layer
/// and supplied to the composer ready-made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
    authentication: Option<Authentication>,
    ssl_on_connect: bool,
    ssl_check_server_identity: bool,
    starttls_enabled: bool,
    starttls_required: bool,
    send_partial: bool,
    bounce_address: Option<String>,
    debug: bool,
    pop_before_smtp: Option<PopBeforeSmtp>,
}

impl Session {
    /// Creates a minimal session for the given host and port.
    ///
    /// Intended for transport layers that construct sessions themselves and
    /// hand them to the composer.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: None,
            io_timeout: None,
            authentication: None,
            ssl_on_connect: false,
            ssl_check_server_identity: false,
            starttls_enabled: false,
            starttls_required: false,
            send_partial: false,
            bounce_address: None,
            debug: false,
            pop_before_smtp: None,
        }
    }

    /// Server host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Effective server port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Socket connection timeout, if configured.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Socket read timeout, if configured.
    #[must_use]
    pub const fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout
    }

    /// Authentication credentials, if configured.
    #[must_use]
    pub const fn authentication(&self) -> Option<&Authentication> {
        self.authentication.as_ref()
    }

    /// Whether SSL is used from the start of the connection.
    #[must_use]
    pub const fn ssl_on_connect(&self) -> bool {
        self.ssl_on_connect
    }

    /// Whether the server certificate identity is verified.
    #[must_use]
    pub const fn ssl_check_server_identity(&self) -> bool {
        self.ssl_check_server_identity
    }

    /// Whether STARTTLS is offered after connecting.
    #[must_use]
    pub const fn starttls_enabled(&self) -> bool {
        self.starttls_enabled
    }

    /// Whether STARTTLS is required.
    #[must_use]
    pub const fn starttls_required(&self) -> bool {
        self.starttls_required
    }

    /// Whether partial delivery is allowed.
    #[must_use]
    pub const fn send_partial(&self) -> bool {
        self.send_partial
    }

    /// Bounce (envelope-from) address, if configured.
    #[must_use]
    pub fn bounce_address(&self) -> Option<&str> {
        self.bounce_address.as_deref()
    }

    /// Whether transport-level debug output is enabled.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// POP-before-SMTP parameters, if configured.
    #[must_use]
    pub const fn pop_before_smtp(&self) -> Option<&PopBeforeSmtp> {
        self.pop_before_smtp.as_ref()
    }
}

/// Narrow seam to the mail-transport layer.
///
/// The composer produces [`MailMessage`] values; a transport consumes them,
/// reading connection parameters from the message's [`Session`]. Sending is
/// outside this crate.
pub trait Transport {
    /// Transport-specific failure type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Hands a built message to the transport for delivery.
    ///
    /// # Errors
    ///
    /// Returns the transport's own error on delivery failure.
    fn send(&mut self, message: &MailMessage) -> std::result::Result<(), Self::Error>;
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
    fn test_resolve_requires_host() {
        let config = SessionConfig::default();
        assert!(matches!(config.resolve(), Err(Error::MissingHost)));
    }

    #[test]
    fn test_resolve_blank_host_rejected() {
        let config = SessionConfig {
            host: Some("   ".to_string()),
            ..SessionConfig::default()
        };
        assert!(matches!(config.resolve(), Err(Error::MissingHost)));
    }

    #[test]
    fn test_resolve_default_port() {
        let config = SessionConfig {
            host: Some("localhost".to_string()),
            ..SessionConfig::default()
        };
        let session = config.resolve().unwrap();
        assert_eq!(session.host(), "localhost");
        assert_eq!(session.port(), DEFAULT_SMTP_PORT);
    }

    #[test]
    fn test_resolve_ssl_port() {
        let config = SessionConfig {
            host: Some("localhost".to_string()),
            ssl_on_connect: true,
            ..SessionConfig::default()
        };
        assert_eq!(config.resolve().unwrap().port(), DEFAULT_SMTPS_PORT);
    }

    #[test]
    fn test_resolve_explicit_ports() {
        let mut config = SessionConfig {
            host: Some("localhost".to_string()),
            smtp_port: Some(2525),
            ssl_smtp_port: Some(4465),
            ..SessionConfig::default()
        };
        assert_eq!(config.resolve().unwrap().port(), 2525);

        config.ssl_on_connect = true;
        assert_eq!(config.resolve().unwrap().port(), 4465);
    }

    #[test]
    fn test_resolve_carries_settings() {
        let config = SessionConfig {
            host: Some("localhost".to_string()),
            connect_timeout: Some(Duration::from_secs(5)),
            io_timeout: Some(Duration::from_secs(2)),
            authentication: Some(Authentication::new("authname", "authpass")),
            ssl_check_server_identity: true,
            starttls_enabled: true,
            starttls_required: true,
            send_partial: true,
            bounce_address: Some("bounce@example.com".to_string()),
            pop_before_smtp: Some(PopBeforeSmtp::new("pop-host", "pop-user", "pop-pass")),
            ..SessionConfig::default()
        };

        let session = config.resolve().unwrap();
        assert_eq!(session.connect_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(session.io_timeout(), Some(Duration::from_secs(2)));
        assert_eq!(
            session.authentication().map(|a| a.username.as_str()),
            Some("authname")
        );
        assert!(session.ssl_check_server_identity());
        assert!(session.starttls_enabled());
        assert!(session.starttls_required());
        assert!(session.send_partial());
        assert_eq!(session.bounce_address(), Some("bounce@example.com"));
        assert_eq!(
            session.pop_before_smtp().map(|p| p.host.as_str()),
            Some("pop-host")
        );
    }

    #[test]
    fn test_session_new_minimal() {
        let session = Session::new("smtp.example.com", 587);
        assert_eq!(session.host(), "smtp.example.com");
        assert_eq!(session.port(), 587);
        assert!(session.authentication().is_none());
    }
}
