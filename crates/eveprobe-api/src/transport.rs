//! Low-level HTTP plumbing shared by the session types.

use std::net::IpAddr;

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

use eveprobe_core::{ProbeError, Result};

/// One HTTP client plus the base URL every request is built against.
///
/// The client carries the cookie jar, so whatever session cookie the server
/// hands out at login is replayed on every later request automatically.
/// Responses are held to a strict 200 contract; anything else becomes a
/// [`ProbeError::Remote`] carrying the body's `message` field when present.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: Client,
    base: Url,
}

impl Transport {
    /// Build a transport rooted at `scheme://host[:port]/`.
    pub(crate) fn new(scheme: &str, host: &str, port: Option<u16>) -> Result<Self> {
        let authority = match host.parse::<IpAddr>() {
            Ok(IpAddr::V6(_)) => format!("[{host}]"),
            _ => host.to_string(),
        };
        let mut base = Url::parse(&format!("{scheme}://{authority}/")).map_err(|err| {
            ProbeError::invalid_config("hostname", &format!("cannot build a base URL: {err}"))
        })?;
        if port.is_some() && base.set_port(port).is_err() {
            return Err(ProbeError::invalid_config(
                "port",
                "the base URL does not accept a port",
            ));
        }
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self { client, base })
    }

    pub(crate) async fn get(&self, path: &str) -> Result<String> {
        let url = self.endpoint(path)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::require_ok(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::require_ok(response).await
    }

    /// Join `path` onto the base URL, percent-escaping each `/`-separated
    /// segment on its own so separators survive and raw lab names do not. A
    /// trailing `/` in `path` is kept; the folder index endpoint needs it.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ProbeError::invalid_config("hostname", "base URL cannot carry path segments")
            })?;
            segments.pop_if_empty();
            let relative = path.strip_prefix('/').unwrap_or(path);
            for segment in relative.split('/') {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    async fn require_ok(response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(ProbeError::remote(
                status.as_u16(),
                extract_message(&body, status.as_u16()),
            ));
        }
        Ok(body)
    }
}

/// EVE-NG error bodies are JSON objects with a human-readable `message`
/// field; anything else falls back to the bare status code.
fn extract_message(body: &str, status: u16) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|message| message.as_str())
                .map(|message| message.to_string())
        })
        .unwrap_or_else(|| format!("status {status}"))
}
