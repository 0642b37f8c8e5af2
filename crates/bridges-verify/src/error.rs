//! Error types for the verification client.

use crate::ingest::MAX_FILE_SIZE;

/// Verification errors.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The address carried no verification token.
    #[error("no verification token found in the address")]
    MissingToken,

    /// Network, DNS or timeout failure talking to the service.
    #[error("transport failure: {message}")]
    TransportFailure { message: String },

    /// The service answered with `success = false`.
    #[error("service rejected the request: {}", message.as_deref().unwrap_or("no message"))]
    ServiceRejection { message: Option<String> },

    /// The service returned a request type the client cannot handle.
    #[error("unknown request type: {}", request_type.as_deref().unwrap_or("<missing>"))]
    UnknownRole { request_type: Option<String> },

    /// Selected file exceeds the upload ceiling.
    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    /// Participant form submitted without a staged document.
    #[error("no document staged for upload")]
    MissingDocument,

    /// Employer form submitted without an employment status selection.
    #[error("employment status not selected")]
    MissingEmploymentStatus,

    /// Date later than the control allows.
    #[error("date {date} is after {max}")]
    DateOutOfRange {
        date: chrono::NaiveDate,
        max: chrono::NaiveDate,
    },

    /// A file read is still in progress.
    #[error("document is still being read")]
    IngestionPending,

    /// The form already has a submission in flight.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// Screen transition not allowed from the current state.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Response body could not be interpreted.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Local file could not be read.
    #[error("io error: {message}")]
    Io { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Title and body shown to the user for a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub title: String,
    pub message: String,
}

impl UserMessage {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

pub(crate) const SUBMIT_REJECTED_FALLBACK: &str =
    "Failed to submit verification. Please try again.";
pub(crate) const SUBMIT_TRANSPORT_FALLBACK: &str =
    "An error occurred. Please check your connection and try again.";

impl VerifyError {
    /// Message for a failure while loading verification details.
    ///
    /// These are terminal for the session and end up on the error screen.
    pub fn load_message(&self) -> UserMessage {
        match self {
            Self::MissingToken => {
                UserMessage::new("Invalid Link", "No verification token found in the URL.")
            }
            Self::ServiceRejection { message } => UserMessage::new(
                "Verification Unavailable",
                non_empty(message).unwrap_or("This verification link is no longer valid."),
            ),
            Self::UnknownRole { .. } => UserMessage::new(
                "Unknown Request Type",
                "Unable to determine verification type.",
            ),
            _ => UserMessage::new(
                "Connection Error",
                "Unable to load verification details. Please check your internet connection and try again.",
            ),
        }
    }

    /// Message for a failure on an interactive form.
    pub fn form_message(&self) -> String {
        match self {
            Self::FileTooLarge { limit, .. } => format!(
                "File is too large. Please select a file under {}MB.",
                limit / (1024 * 1024)
            ),
            Self::MissingDocument => "Please upload a document.".to_string(),
            Self::MissingEmploymentStatus => {
                "Please indicate whether the person is still employed.".to_string()
            }
            Self::DateOutOfRange { max, .. } => {
                format!("Please choose a date on or before {max}.")
            }
            Self::IngestionPending => {
                "Please wait until the document has finished loading.".to_string()
            }
            Self::SubmissionInFlight => "Your submission is already being sent.".to_string(),
            Self::ServiceRejection { message } => non_empty(message)
                .unwrap_or(SUBMIT_REJECTED_FALLBACK)
                .to_string(),
            Self::Io { message } => format!("Unable to read the selected file: {message}"),
            _ => SUBMIT_TRANSPORT_FALLBACK.to_string(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Link / config issues
            Self::MissingToken => 1,
            Self::Config { .. } => 1,
            Self::UnknownRole { .. } => 1,

            // Local validation
            Self::FileTooLarge { .. } => 2,
            Self::MissingDocument => 2,
            Self::MissingEmploymentStatus => 2,
            Self::DateOutOfRange { .. } => 2,
            Self::IngestionPending => 2,
            Self::SubmissionInFlight => 2,
            Self::InvalidTransition { .. } => 2,
            Self::Io { .. } => 2,

            // Service said no
            Self::ServiceRejection { .. } => 3,

            // Network/transient
            Self::TransportFailure { .. } => 5,
            Self::InvalidResponse { .. } => 5,
        }
    }

    /// Whether the user can fix this without reloading the page.
    ///
    /// Only meaningful on a form screen; loading failures are always terminal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::MissingToken | Self::UnknownRole { .. } | Self::Config { .. }
        )
    }

    /// Whether the error was raised before anything reached the network.
    pub fn is_local_validation(&self) -> bool {
        matches!(
            self,
            Self::FileTooLarge { .. }
                | Self::MissingDocument
                | Self::MissingEmploymentStatus
                | Self::DateOutOfRange { .. }
                | Self::IngestionPending
                | Self::SubmissionInFlight
        )
    }

    pub(crate) fn file_too_large(size: u64) -> Self {
        Self::FileTooLarge {
            size,
            limit: MAX_FILE_SIZE,
        }
    }
}

/// Blank service messages count as absent.
fn non_empty(message: &Option<String>) -> Option<&str> {
    message.as_deref().filter(|m| !m.trim().is_empty())
}

impl From<reqwest::Error> for VerifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportFailure {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for VerifyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for verification operations.
pub type VerifyResult<T> = Result<T, VerifyError>;
