//! Session lifecycle: unauthenticated client, authenticated session.

use std::net::IpAddr;

use serde::Serialize;

use eveprobe_config::ConnectionConfig;
use eveprobe_core::{ProbeError, Result};

use crate::transport::Transport;

/// An unauthenticated handle to one EVE-NG server.
///
/// Construction validates the connection parameters without touching the
/// network. [`EveClient::login`] consumes the client and yields an
/// [`EveSession`], which is the only type carrying the data calls, so
/// fetching before login is not expressible.
#[derive(Debug)]
pub struct EveClient {
    transport: Transport,
    username: String,
    password: String,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl EveClient {
    /// Validate the connection parameters and prepare a client.
    ///
    /// The hostname must be an IP address or a syntactically valid host
    /// name; username and password must be non-empty. Whether the host is
    /// actually reachable is only found out at [`EveClient::login`].
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        validate_host(&config.hostname)?;
        if config.username.is_empty() {
            return Err(ProbeError::invalid_config("username", "must not be empty"));
        }
        if config.password.is_empty() {
            return Err(ProbeError::invalid_config("password", "must not be empty"));
        }
        let transport = Transport::new(config.protocol.scheme(), &config.hostname, config.port)?;
        Ok(Self {
            transport,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Log in, consuming the client into an authenticated session.
    pub async fn login(self) -> Result<EveSession> {
        let credentials = Credentials {
            username: &self.username,
            password: &self.password,
        };
        self.transport
            .post_json("/api/auth/login", &credentials)
            .await
            .map_err(ProbeError::auth)?;
        tracing::debug!("logged in as '{}'", self.username);
        Ok(EveSession {
            transport: self.transport,
        })
    }
}

/// An authenticated EVE-NG session.
///
/// Dropping the session without [`EveSession::logout`] leaves the server
/// side session open; callers are expected to log out on every exit path
/// once login succeeded, even after failed data calls.
#[derive(Debug)]
pub struct EveSession {
    pub(crate) transport: Transport,
}

impl EveSession {
    /// Log out, consuming the session.
    pub async fn logout(self) -> Result<()> {
        self.transport.get("/api/auth/logout").await?;
        tracing::debug!("logged out");
        Ok(())
    }
}

fn validate_host(hostname: &str) -> Result<()> {
    if hostname.is_empty() {
        return Err(ProbeError::invalid_config("hostname", "must not be empty"));
    }
    if hostname.parse::<IpAddr>().is_ok() {
        return Ok(());
    }
    url::Host::parse(hostname).map_err(|_| {
        ProbeError::invalid_config(
            "hostname",
            "neither a valid IP address nor a valid host name",
        )
    })?;
    Ok(())
}
