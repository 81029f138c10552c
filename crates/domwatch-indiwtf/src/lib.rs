//! Indiwtf adapter (domain block status).
//!
//! Implements `DomainStatusApi` over `GET {base}/check?domain=..&token=..`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use domwatch_core::{errors::Error, ports::DomainStatusApi, status::ApiReply, Result};

const MISSING_TOKEN: &str = "Indiwtf API token is not configured.";

#[derive(Clone, Debug)]
pub struct IndiwtfClient {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    http: reqwest::Client,
}

impl IndiwtfClient {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("indiwtf client build error: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            timeout,
            http,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    fn check_url(&self) -> String {
        format!("{}/check", self.base_url)
    }

    fn map_err(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            return Error::Timeout(self.timeout);
        }
        Error::External(format!("indiwtf request error: {e}"))
    }
}

#[async_trait]
impl DomainStatusApi for IndiwtfClient {
    async fn check_domain(&self, domain: &str) -> Result<ApiReply> {
        let Some(token) = self.token.as_deref() else {
            return Err(Error::Config(MISSING_TOKEN.to_string()));
        };

        let resp = self
            .http
            .get(self.check_url())
            .query(&[("domain", domain), ("token", token)])
            .send()
            .await
            .map_err(|e| self.map_err(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_err(e))?;
        debug!(domain, http_status = status.as_u16(), "indiwtf replied");

        if let Some(reply) = decode_body(status.is_success(), &body) {
            return Ok(reply);
        }

        if status.is_success() {
            Err(Error::External(format!(
                "unexpected response from Indiwtf: {}",
                snippet(&body)
            )))
        } else {
            Err(Error::External(format!("Indiwtf request failed: HTTP {status}")))
        }
    }
}

/// Decode a response body into a tagged reply.
///
/// An `error` field always wins. Non-success responses may also carry `message`.
/// Success bodies need a string `status`. Anything else is `None` and the caller
/// falls back to a generic error.
fn decode_body(success: bool, body: &str) -> Option<ApiReply> {
    let v: Value = serde_json::from_str(body).ok()?;
    let obj = v.as_object()?;

    if let Some(err) = obj.get("error").filter(|e| !e.is_null()) {
        return Some(ApiReply::Failure {
            message: value_text(err),
        });
    }

    if !success {
        let message = obj.get("message").and_then(Value::as_str)?;
        return Some(ApiReply::Failure {
            message: message.to_string(),
        });
    }

    let status = obj.get("status").and_then(Value::as_str)?;
    Some(ApiReply::Success {
        status: status.to_string(),
        ip: obj.get("ip").and_then(Value::as_str).map(str::to_string),
    })
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
