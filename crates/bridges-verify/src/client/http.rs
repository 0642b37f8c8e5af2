//! HTTP layer: request building and response interpretation.
//!
//! This is the ONLY place that looks at status codes. The service reports
//! business failures as `{"success": false, "message": ...}`, sometimes with a
//! non-2xx status, so a parseable JSON body always wins over the status line.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{VerifyError, VerifyResult};

/// Upper bound on how much of an unparseable body ends up in an error message.
const BODY_SNIPPET_CHARS: usize = 200;

/// HTTP backend (holds the reqwest client and the endpoint base).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl HttpBackend {
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> VerifyResult<T> {
        let response = self.client.get(url).send().await?;
        Self::read_json(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, url: &str, body: &B) -> VerifyResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(url).json(body).send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> VerifyResult<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VerifyError::TransportFailure {
                message: format!("failed to read response body: {}", e),
            })?;

        match serde_json::from_str::<T>(&text) {
            Ok(value) => {
                if !status.is_success() {
                    debug!(status = status.as_u16(), "service returned JSON with error status");
                }
                Ok(value)
            }
            Err(e) => Err(interpret_unparseable(status, &text, e)),
        }
    }
}

fn interpret_unparseable(status: StatusCode, body: &str, err: serde_json::Error) -> VerifyError {
    let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();

    if status.is_success() {
        warn!(error = %err, "service returned an unparseable body");
        VerifyError::InvalidResponse {
            message: format!("failed to parse response: {}", err),
        }
    } else {
        warn!(status = status.as_u16(), "service returned a non-JSON error");
        VerifyError::TransportFailure {
            message: format!("HTTP {}: {}", status.as_u16(), snippet),
        }
    }
}
