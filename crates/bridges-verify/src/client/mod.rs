//! Client for the verification service.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use crate::error::{VerifyError, VerifyResult};
use crate::session::redact;
use crate::types::{
    DetailsResponse, EmployerPayload, ParticipantPayload, SubmitResponse, VerifyConfig,
};

mod http;

use http::HttpBackend;

/// User agent sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!("bridges-verify/", env!("CARGO_PKG_VERSION"));

const JSON: &str = "application/json";

/// Client for `GET`/`POST {api}/{token}`.
#[derive(Debug, Clone)]
pub struct VerifyClient {
    http: HttpBackend,
}

impl VerifyClient {
    pub fn new(config: VerifyConfig) -> VerifyResult<Self> {
        if config.api_url.trim().is_empty() {
            return Err(VerifyError::Config {
                message: "api url is empty".to_string(),
            });
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        default_headers.insert(ACCEPT, HeaderValue::from_static(JSON));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| VerifyError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url: config.api_url.trim_end_matches('/').to_string(),
            },
        })
    }

    pub fn from_env() -> VerifyResult<Self> {
        Self::new(VerifyConfig::from_env())
    }

    /// Fetch the verification details for a token.
    pub async fn fetch_details(&self, token: &str) -> VerifyResult<DetailsResponse> {
        debug!(token = %redact(token), "fetching verification details");
        self.http.get_json(&self.endpoint(token)).await
    }

    /// Post the participant's document.
    pub async fn submit_participant(
        &self,
        token: &str,
        payload: &ParticipantPayload,
    ) -> VerifyResult<SubmitResponse> {
        debug!(
            token = %redact(token),
            file = %payload.file_name,
            file_type = %payload.file_type,
            "submitting participant verification"
        );
        self.http.post_json(&self.endpoint(token), payload).await
    }

    /// Post the employer's confirmation.
    pub async fn submit_employer(
        &self,
        token: &str,
        payload: &EmployerPayload,
    ) -> VerifyResult<SubmitResponse> {
        debug!(
            token = %redact(token),
            is_employed = payload.is_employed,
            "submitting employer verification"
        );
        self.http.post_json(&self.endpoint(token), payload).await
    }

    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    fn endpoint(&self, token: &str) -> String {
        format!("{}/{}", self.http.base_url, token)
    }
}
