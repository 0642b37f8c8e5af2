//! In-memory verification session.
//!
//! Writers per field:
//! - `token`: constructor only
//! - `role`, `verification_level`, `request_id`, `job_placement`: [`VerificationSession::apply_context`]
//! - `staged_file`: the selection ticket API and [`VerificationSession::clear_file`]

use tracing::{debug, warn};

use crate::error::{VerifyError, VerifyResult};
use crate::ingest::StagedFile;
use crate::types::{JobPlacement, Role, VerificationContext};

/// Identifies one file selection. Only the most recent ticket may stage a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket(u64);

/// State for one verification link.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    token: String,
    role: Role,
    verification_level: Option<String>,
    request_id: Option<String>,
    job_placement: Option<JobPlacement>,
    staged_file: Option<StagedFile>,
    selection_seq: u64,
    pending_selection: Option<u64>,
}

impl VerificationSession {
    pub fn new(token: impl Into<String>, role: Role) -> VerifyResult<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(VerifyError::MissingToken);
        }

        Ok(Self {
            token,
            role,
            verification_level: None,
            request_id: None,
            job_placement: None,
            staged_file: None,
            selection_seq: 0,
            pending_selection: None,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn verification_level(&self) -> Option<&str> {
        self.verification_level.as_deref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn job_placement(&self) -> Option<&JobPlacement> {
        self.job_placement.as_ref()
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.staged_file.as_ref()
    }

    /// Whether a file read is in progress for the latest selection.
    pub fn is_ingesting(&self) -> bool {
        self.pending_selection.is_some()
    }

    /// Apply the service's view of the request. The service role is authoritative.
    pub fn apply_context(&mut self, context: &VerificationContext) {
        if self.role != context.role {
            debug!(from = %self.role, to = %context.role, "service overrides address role");
        }
        self.role = context.role;
        self.verification_level = context.verification_level.clone();
        self.request_id = context.request_id.clone();
        self.job_placement = context.job_placement.clone();
    }

    /// Start a new file selection, superseding any read still in flight.
    pub fn begin_selection(&mut self) -> SelectionTicket {
        self.selection_seq += 1;
        self.pending_selection = Some(self.selection_seq);
        SelectionTicket(self.selection_seq)
    }

    /// Stage the result of a read. Returns `false` if the ticket was superseded.
    pub fn complete_selection(&mut self, ticket: SelectionTicket, file: StagedFile) -> bool {
        if !self.is_current(ticket) {
            warn!(
                ticket = ticket.0,
                latest = self.selection_seq,
                "discarding stale file read"
            );
            return false;
        }
        self.pending_selection = None;
        self.staged_file = Some(file);
        true
    }

    /// Drop a selection whose read failed. The previously staged file is kept.
    ///
    /// Returns `false` if the ticket was already superseded.
    pub fn abandon_selection(&mut self, ticket: SelectionTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.pending_selection = None;
        true
    }

    /// Remove the staged file and cancel any pending read. Idempotent.
    pub fn clear_file(&mut self) -> bool {
        self.selection_seq += 1;
        self.pending_selection = None;
        self.staged_file.take().is_some()
    }

    fn is_current(&self, ticket: SelectionTicket) -> bool {
        self.pending_selection == Some(ticket.0)
    }
}

/// Short form of a token for logs.
pub(crate) fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}***")
}
