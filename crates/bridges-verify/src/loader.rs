//! Detail loading: token → verification context.

use tracing::{info, warn};

use crate::client::VerifyClient;
use crate::error::{VerifyError, VerifyResult};
use crate::session::redact;
use crate::types::{DetailsResponse, Role, VerificationContext};

/// Fetch and interpret the verification details for a token. Never retried.
pub async fn load_details(client: &VerifyClient, token: &str) -> VerifyResult<VerificationContext> {
    let response = client.fetch_details(token).await.map_err(|e| {
        warn!(token = %redact(token), error = %e, "failed to load verification details");
        e
    })?;

    let context = interpret_details(response)?;
    info!(
        token = %redact(token),
        role = %context.role,
        level = context.verification_level.as_deref().unwrap_or("-"),
        "verification details loaded"
    );
    Ok(context)
}

/// Map a details response onto a context, or the matching failure.
pub fn interpret_details(response: DetailsResponse) -> VerifyResult<VerificationContext> {
    if !response.success {
        return Err(VerifyError::ServiceRejection {
            message: response.message,
        });
    }

    let role = response
        .request_type
        .as_deref()
        .map(Role::from_request_type)
        .unwrap_or(Role::Unknown);

    if role == Role::Unknown {
        return Err(VerifyError::UnknownRole {
            request_type: response.request_type,
        });
    }

    Ok(VerificationContext {
        role,
        verification_level: response.verification_level,
        request_id: response.request_id,
        job_placement: response.job_placement,
    })
}
