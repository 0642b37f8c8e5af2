//! Form state, payload building and the submit busy guard.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;

use crate::error::{VerifyError, VerifyResult};
use crate::ingest::StagedFile;
use crate::types::{EmployerPayload, ParticipantPayload, SubmitResponse};

/// The only verification type the participant form offers.
pub const VERIFICATION_TYPE_DOCUMENT: &str = "document";

/// Date control capped at the day the form was initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInput {
    value: NaiveDate,
    max: NaiveDate,
}

impl DateInput {
    /// Defaults to `today`, which is also the latest accepted date.
    pub fn capped_at(today: NaiveDate) -> Self {
        Self {
            value: today,
            max: today,
        }
    }

    pub fn value(&self) -> NaiveDate {
        self.value
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }

    /// Refuses dates after the cap; the current value is kept on refusal.
    pub fn set(&mut self, date: NaiveDate) -> VerifyResult<()> {
        if date > self.max {
            return Err(VerifyError::DateOutOfRange {
                date,
                max: self.max,
            });
        }
        self.value = date;
        Ok(())
    }
}

/// Participant form fields. The document itself lives in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantForm {
    pub last_work_date: DateInput,
}

impl ParticipantForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            last_work_date: DateInput::capped_at(today),
        }
    }

    /// Build the payload; the staged file is required.
    pub fn payload(&self, staged: Option<&StagedFile>) -> VerifyResult<ParticipantPayload> {
        let file = staged.ok_or(VerifyError::MissingDocument)?;
        Ok(ParticipantPayload {
            verification_type: VERIFICATION_TYPE_DOCUMENT.to_string(),
            file_data: file.encoded_payload.clone(),
            file_name: file.file_name.clone(),
            file_type: file.mime_type.clone(),
            last_work_date: self.last_work_date.value(),
        })
    }
}

/// Employer form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerForm {
    /// `None` until one of the two radio options is picked.
    pub is_employed: Option<bool>,
    pub last_work_date: DateInput,
    pub comments: String,
    pub signature_name: String,
    pub signature_title: String,
}

impl EmployerForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            is_employed: None,
            last_work_date: DateInput::capped_at(today),
            comments: String::new(),
            signature_name: String::new(),
            signature_title: String::new(),
        }
    }

    /// Build the payload; the employment status is required.
    pub fn payload(&self) -> VerifyResult<EmployerPayload> {
        let is_employed = self.is_employed.ok_or(VerifyError::MissingEmploymentStatus)?;
        Ok(EmployerPayload {
            is_employed,
            last_work_date: self.last_work_date.value(),
            comments: self.comments.clone(),
            signature_name: self.signature_name.clone(),
            signature_title: self.signature_title.clone(),
        })
    }
}

/// Turn a submit response into success or a rejection.
pub fn interpret_submission(response: SubmitResponse) -> VerifyResult<()> {
    if response.success {
        Ok(())
    } else {
        Err(VerifyError::ServiceRejection {
            message: response.message,
        })
    }
}

/// Busy state of a form's submit button. At most one submission in flight.
#[derive(Debug, Default)]
pub struct SubmitControl {
    busy: AtomicBool,
}

impl SubmitControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Mark the control busy until the returned guard is dropped.
    pub fn try_begin(&self) -> VerifyResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| VerifyError::SubmissionInFlight)?;
        Ok(BusyGuard { control: self })
    }
}

/// Re-enables the submit control on drop.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    control: &'a SubmitControl,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.busy.store(false, Ordering::Release);
    }
}
