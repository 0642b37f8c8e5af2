//! Wire types for the verification service and client configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which party is interacting with the verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Submits proof of work history.
    Participant,
    /// Confirms the participant's employment.
    Employer,
    /// Not (yet) known.
    Unknown,
}

impl Role {
    /// Role from the short path code (`p` / `e`).
    pub fn from_code(code: &str) -> Self {
        match code {
            "p" => Self::Participant,
            "e" => Self::Employer,
            _ => Self::Unknown,
        }
    }

    /// Role from a service `requestType` value.
    pub fn from_request_type(value: &str) -> Self {
        match value {
            "Participant" => Self::Participant,
            "Employer" => Self::Employer,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "Participant",
            Self::Employer => "Employer",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job placement data shown next to the form.
///
/// Participant sessions carry the employer-facing fields, employer sessions the
/// participant-facing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPlacement {
    #[serde(default)]
    pub employer_name: Option<String>,

    #[serde(default)]
    pub job_title: Option<String>,

    #[serde(default)]
    pub participant_name: Option<String>,
}

/// Response from `GET {api}/{token}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResponse {
    /// A missing flag counts as a rejection.
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub request_type: Option<String>,

    #[serde(default)]
    pub verification_level: Option<String>,

    #[serde(default)]
    pub request_id: Option<String>,

    #[serde(default)]
    pub job_placement: Option<JobPlacement>,
}

/// Response from `POST {api}/{token}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

/// Verification context resolved by the detail loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationContext {
    /// Service-confirmed role; always Participant or Employer.
    pub role: Role,
    pub verification_level: Option<String>,
    pub request_id: Option<String>,
    pub job_placement: Option<JobPlacement>,
}

/// Body posted by the participant form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPayload {
    /// Always `"document"`.
    pub verification_type: String,

    /// Base64 file content without the data-URL prefix.
    pub file_data: String,

    pub file_name: String,

    pub file_type: String,

    pub last_work_date: NaiveDate,
}

/// Body posted by the employer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerPayload {
    pub is_employed: bool,

    pub last_work_date: NaiveDate,

    #[serde(default)]
    pub comments: String,

    #[serde(default)]
    pub signature_name: String,

    #[serde(default)]
    pub signature_title: String,
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    /// Base URL of the verification endpoint; the token is appended as a path segment.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://bridgestowork.my.site.com/forms/services/apexrest/verify".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl VerifyConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `BRIDGES_VERIFY_API_URL` | Verification endpoint base URL |
    /// | `BRIDGES_VERIFY_TIMEOUT` | Request timeout in seconds (default: 30) |
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("BRIDGES_VERIFY_API_URL").unwrap_or_else(|_| default_api_url()),
            timeout_secs: std::env::var("BRIDGES_VERIFY_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
        }
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
