use crate::warehouse::error::DbError;
use planner::query::ident::validate_identifier;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 8123,
            Protocol::Https => 8443,
        }
    }
}

impl FromStr for Protocol {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            other => Err(DbError::InvalidConfig(format!(
                "unsupported protocol '{other}', expected http or https"
            ))),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => f.write_str("http"),
            Protocol::Https => f.write_str("https"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    #[default]
    Anonymous,
    Password {
        username: String,
        password: String,
    },
    Bearer(String),
}

impl Credentials {
    /// Picks the credentials to use. A bearer token wins over a username and
    /// password when both are present.
    pub fn resolve(
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
    ) -> Self {
        let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());

        if let Some(token) = non_empty(token) {
            return Credentials::Bearer(token);
        }
        match (non_empty(username), password) {
            (Some(username), password) => Credentials::Password {
                username,
                password: password.unwrap_or_default(),
            },
            (None, _) => Credentials::Anonymous,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Everything needed to reach one warehouse database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub database: String,
    pub credentials: Credentials,
}

impl ConnectionConfig {
    pub fn new(
        host: impl Into<String>,
        port: Option<u16>,
        protocol: Protocol,
        database: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        ConnectionConfig {
            host: host.into(),
            port: port.unwrap_or_else(|| protocol.default_port()),
            protocol,
            database: database.into(),
            credentials,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}/", self.protocol, self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), DbError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(DbError::InvalidConfig("host is required".into()));
        }
        if host.contains("://") || host.contains('/') {
            return Err(DbError::InvalidConfig(format!(
                "host '{host}' must not include a scheme or path"
            )));
        }
        if self.port == 0 {
            return Err(DbError::InvalidConfig("port must be non-zero".into()));
        }
        validate_identifier(&self.database)
            .map_err(|e| DbError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}
