//! Process exit codes.
//!
//! Failures reported by the service or the form map through
//! `VerifyError::exit_code`; these cover the remaining outcomes.

pub const SUCCESS: i32 = 0;
pub const LINK_ERROR: i32 = 1; // Error screen reached while loading
pub const WRONG_FORM: i32 = 4; // Link belongs to the other party
pub const INTERNAL_ERROR: i32 = 6; // Setup failed or unexpected error
