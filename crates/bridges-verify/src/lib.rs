//! Client for the Bridges work-verification service.
//!
//! A verification link carries a one-time token. The participant named on the
//! request uploads proof of employment; the employer confirms or denies it.
//! This crate implements the client side of that exchange:
//!
//! - Token resolution from `/p/{token}`, `/e/{token}` or `?token=...&type=...`
//! - Detail loading and role-specific form selection
//! - Document ingestion (10 MiB ceiling, base64 payload, preview classification)
//! - Validated submission with a single-flight busy guard
//!
//! # Quick Start
//!
//! ```no_run
//! use bridges_verify::{FileHandle, Screen, VerificationFlow, VerifyClient};
//!
//! # async fn example() -> bridges_verify::VerifyResult<()> {
//! let client = VerifyClient::from_env()?;
//! let flow = VerificationFlow::start(client, "https://verify.example.org/p/TOK123").await;
//!
//! if flow.screen().await == Screen::ParticipantForm {
//!     flow.select_file(FileHandle::open("paystub.pdf").await?).await?;
//!     let form = flow.participant_form();
//!     flow.submit_participant(&form).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `BRIDGES_VERIFY_API_URL` | Verification endpoint (default: the production Salesforce site) |
//! | `BRIDGES_VERIFY_TIMEOUT` | Request timeout in seconds (default: 30) |

pub mod address;
pub mod client;
pub mod error;
pub mod flow;
pub mod ingest;
pub mod loader;
pub mod screen;
pub mod session;
pub mod submit;
pub mod types;

// Re-export main types
pub use address::{resolve_address, ResolvedAddress};
pub use client::{VerifyClient, CLIENT_USER_AGENT};
pub use error::{UserMessage, VerifyError, VerifyResult};
pub use flow::VerificationFlow;
pub use ingest::{FileHandle, PreviewKind, StagedFile, MAX_FILE_SIZE};
pub use loader::load_details;
pub use screen::{Screen, ScreenController};
pub use session::{SelectionTicket, VerificationSession};
pub use submit::{DateInput, EmployerForm, ParticipantForm, SubmitControl};
pub use types::{
    DetailsResponse, EmployerPayload, JobPlacement, ParticipantPayload, Role, SubmitResponse,
    VerificationContext, VerifyConfig,
};
