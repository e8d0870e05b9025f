//! Reqwest-based client for the Apps Script `scripts.run` endpoint.

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{
    config::Config,
    execution::{InvocationRequest, Operation},
};

pub const DEFAULT_SCRIPT_API_BASE: &str = "https://script.googleapis.com";

/// The call did not reach the script runtime, or the API rejected it.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
}

pub struct ScriptsClient {
    client: Client,
    base: String,
    access_token: String,
}

impl ScriptsClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let access_token = cfg
            .get("SCRIPT_ACCESS_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Missing SCRIPT_ACCESS_TOKEN. Set it in env or {}",
                    cfg.config_path.display()
                )
            })?;

        let base = match cfg.get("API_BASE_URL") {
            Some(b) if b != "default" => b,
            _ => DEFAULT_SCRIPT_API_BASE.to_string(),
        };

        let timeout_secs = cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(60);

        Self::new(base, access_token, Duration::from_secs(timeout_secs))
    }

    pub fn new(base: impl Into<String>, access_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base, access_token))
    }

    /// Use a preconfigured reqwest client (proxy, TLS or timeout settings of the caller's choosing).
    pub fn with_client(client: Client, base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self { client, base: base.into(), access_token: access_token.into() }
    }

    /// Execute one function call. The request is consumed; a fresh one is needed per call.
    pub async fn run(&self, request: InvocationRequest) -> Result<Operation, TransportError> {
        let url = run_url(&self.base, request.script_id());
        tracing::debug!(%url, function = request.function(), dev_mode = request.dev_mode(), "running script function");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            // Shape checks belong to the classifier; an unparseable body becomes
            // an empty operation, which it reports as malformed.
            let bytes = resp.bytes().await?;
            let body = serde_json::from_slice::<Value>(&bytes).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "script run body is not JSON");
                Value::Null
            });
            let op = Operation::from_value(body);
            tracing::debug!(done = ?op.done, has_error = op.error.is_some(), "script run finished");
            return Ok(op);
        }

        let text = resp.text().await.unwrap_or_default();
        tracing::debug!(%status, body = %text, "script API rejected the call");
        Err(TransportError::Api {
            status: status.as_u16(),
            message: api_error_message(status, &text),
        })
    }
}

pub fn run_url(base: &str, script_id: &str) -> String {
    format!("{}/v1/scripts/{}:run", base.trim_end_matches('/'), script_id)
}

// Google APIs wrap failures as {"error": {"code", "message", "status"}}.
fn api_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(str::to_string))
        .or_else(|| Some(body.trim().to_string()))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_url_trims_trailing_slash() {
        assert_eq!(
            run_url("https://script.googleapis.com/", "abc"),
            "https://script.googleapis.com/v1/scripts/abc:run"
        );
        assert_eq!(run_url("http://localhost:8080", "x"), "http://localhost:8080/v1/scripts/x:run");
    }

    #[test]
    fn api_error_message_prefers_google_error_body() {
        let body = r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#;
        assert_eq!(
            api_error_message(StatusCode::UNAUTHORIZED, body),
            "Request had invalid authentication credentials."
        );
    }

    #[test]
    fn api_error_message_falls_back_to_text_then_reason() {
        assert_eq!(api_error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"), "upstream down");
        assert_eq!(api_error_message(StatusCode::NOT_FOUND, ""), "Not Found");
    }

    #[test]
    fn api_error_displays_message_and_status() {
        let err = TransportError::Api { status: 403, message: "The caller does not have permission".into() };
        assert_eq!(err.to_string(), "The caller does not have permission (HTTP 403)");
    }
}
