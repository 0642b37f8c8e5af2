//! The verification flow: address → details → form → submission.
//!
//! `VerificationFlow` owns the session, the screen controller and one submit
//! control per form. State sits behind a mutex that is never held across a
//! network call or file read, so every method takes `&self` and the caller may
//! drive several of them concurrently (e.g. a second click while the first
//! submission is still in flight).

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::address::resolve_address;
use crate::client::VerifyClient;
use crate::error::{VerifyError, VerifyResult};
use crate::ingest::{self, FileHandle};
use crate::loader::load_details;
use crate::screen::{Screen, ScreenController};
use crate::session::{redact, VerificationSession};
use crate::submit::{
    interpret_submission, EmployerForm, ParticipantForm, SubmitControl,
};
use crate::types::{EmployerPayload, ParticipantPayload, Role};

#[derive(Debug)]
struct FlowState {
    screen: ScreenController,
    /// `None` only when the address had no token.
    session: Option<VerificationSession>,
}

impl FlowState {
    /// Session for the given role's form, if that form is the active screen.
    fn form_session(&self, role: Role) -> VerifyResult<&VerificationSession> {
        let current = self.screen.current();
        match (&self.session, current.form_role()) {
            (Some(session), Some(active)) if active == role => Ok(session),
            _ => Err(VerifyError::InvalidTransition {
                from: current.name().to_string(),
                to: format!("{} submission", role.as_str().to_lowercase()),
            }),
        }
    }

    fn prepare_participant(
        &self,
        form: &ParticipantForm,
    ) -> VerifyResult<(String, ParticipantPayload)> {
        let session = self.form_session(Role::Participant)?;
        if session.is_ingesting() {
            return Err(VerifyError::IngestionPending);
        }
        let payload = form.payload(session.staged_file())?;
        Ok((session.token().to_string(), payload))
    }

    fn prepare_employer(&self, form: &EmployerForm) -> VerifyResult<(String, EmployerPayload)> {
        let session = self.form_session(Role::Employer)?;
        let payload = form.payload()?;
        Ok((session.token().to_string(), payload))
    }

    /// Surface an error on the active form. Wrong-screen errors have no form to show on.
    fn notify_error(&mut self, err: &VerifyError) {
        if matches!(err, VerifyError::InvalidTransition { .. }) {
            return;
        }
        if let Err(e) = self.screen.notify(err.form_message()) {
            debug!(error = %e, "notice dropped");
        }
    }
}

/// One verification link's lifetime.
#[derive(Debug)]
pub struct VerificationFlow {
    client: VerifyClient,
    state: Mutex<FlowState>,
    participant_submit: SubmitControl,
    employer_submit: SubmitControl,
}

impl VerificationFlow {
    /// Resolve the address. Without a token the flow goes straight to the error screen.
    pub fn new(client: VerifyClient, address: &str) -> Self {
        let resolved = resolve_address(address);
        let mut screen = ScreenController::new();

        let session = match resolved
            .require_token()
            .and_then(|(token, role)| VerificationSession::new(token, role))
        {
            Ok(session) => {
                debug!(
                    token = %redact(session.token()),
                    role = %session.role(),
                    "address resolved"
                );
                Some(session)
            }
            Err(e) => {
                warn!(error = %e, "no verification token in address");
                if let Err(e) = screen.show_error(e.load_message()) {
                    debug!(error = %e, "error screen not shown");
                }
                None
            }
        };

        Self {
            client,
            state: Mutex::new(FlowState { screen, session }),
            participant_submit: SubmitControl::new(),
            employer_submit: SubmitControl::new(),
        }
    }

    /// Resolve the address and load the details in one go.
    pub async fn start(client: VerifyClient, address: &str) -> Self {
        let flow = Self::new(client, address);
        if let Err(e) = flow.load().await {
            debug!(error = %e, "flow stopped on load");
        }
        flow
    }

    /// Fetch the details and show the matching form, or the error screen.
    pub async fn load(&self) -> VerifyResult<()> {
        let token = {
            let state = self.state.lock().await;
            if *state.screen.current() != Screen::Loading {
                return Err(VerifyError::InvalidTransition {
                    from: state.screen.current().name().to_string(),
                    to: "loading".to_string(),
                });
            }
            match &state.session {
                Some(session) => session.token().to_string(),
                None => return Err(VerifyError::MissingToken),
            }
        };

        let result = load_details(&self.client, &token).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(context) => {
                if let Some(session) = state.session.as_mut() {
                    session.apply_context(&context);
                }
                state.screen.show_form(context.role)
            }
            Err(e) => {
                state.screen.show_error(e.load_message())?;
                Err(e)
            }
        }
    }

    pub async fn screen(&self) -> Screen {
        self.state.lock().await.screen.current().clone()
    }

    pub async fn notice(&self) -> Option<String> {
        self.state.lock().await.screen.notice().map(String::from)
    }

    pub async fn dismiss_notice(&self) {
        self.state.lock().await.screen.dismiss_notice();
    }

    /// Copy of the session, if the address had a token.
    pub async fn session(&self) -> Option<VerificationSession> {
        self.state.lock().await.session.clone()
    }

    /// Participant form with today's defaults.
    pub fn participant_form(&self) -> ParticipantForm {
        ParticipantForm::new(today())
    }

    /// Employer form with today's defaults.
    pub fn employer_form(&self) -> EmployerForm {
        EmployerForm::new(today())
    }

    pub fn participant_submit_busy(&self) -> bool {
        self.participant_submit.is_busy()
    }

    pub fn employer_submit_busy(&self) -> bool {
        self.employer_submit.is_busy()
    }

    /// Read and stage a document on the participant form.
    ///
    /// Returns `Ok(false)` when a newer selection (or a clear) superseded this
    /// one while it was being read; the result is then discarded.
    pub async fn select_file(&self, handle: FileHandle) -> VerifyResult<bool> {
        let ticket = {
            let mut state = self.state.lock().await;
            let checked = state
                .form_session(Role::Participant)
                .and_then(|_| ingest::check_size(&handle));
            if let Err(e) = checked {
                state.notify_error(&e);
                return Err(e);
            }
            match state.session.as_mut() {
                Some(session) => session.begin_selection(),
                None => return Err(VerifyError::MissingToken),
            }
        };

        let result = ingest::ingest(&handle).await;

        let mut state = self.state.lock().await;
        let Some(session) = state.session.as_mut() else {
            return Err(VerifyError::MissingToken);
        };
        match result {
            Ok(staged) => Ok(session.complete_selection(ticket, staged)),
            Err(e) => {
                warn!(file = %handle.name(), error = %e, "file read failed");
                // A superseded read has no form left to report on.
                if session.abandon_selection(ticket) {
                    state.notify_error(&e);
                }
                Err(e)
            }
        }
    }

    /// Drop the staged document. Safe to call repeatedly.
    pub async fn clear_file(&self) -> bool {
        let mut state = self.state.lock().await;
        match state.session.as_mut() {
            Some(session) => session.clear_file(),
            None => false,
        }
    }

    /// Submit the participant form.
    pub async fn submit_participant(&self, form: &ParticipantForm) -> VerifyResult<()> {
        let _busy = self.participant_submit.try_begin()?;

        let (token, payload) = {
            let mut state = self.state.lock().await;
            let prepared = state.prepare_participant(form);
            if let Err(e) = &prepared {
                state.notify_error(e);
            }
            prepared?
        };

        let result = self
            .client
            .submit_participant(&token, &payload)
            .await
            .and_then(interpret_submission);
        self.finish_submission(Role::Participant, result).await
    }

    /// Submit the employer form.
    pub async fn submit_employer(&self, form: &EmployerForm) -> VerifyResult<()> {
        let _busy = self.employer_submit.try_begin()?;

        let (token, payload) = {
            let mut state = self.state.lock().await;
            let prepared = state.prepare_employer(form);
            if let Err(e) = &prepared {
                state.notify_error(e);
            }
            prepared?
        };

        let result = self
            .client
            .submit_employer(&token, &payload)
            .await
            .and_then(interpret_submission);
        self.finish_submission(Role::Employer, result).await
    }

    async fn finish_submission(&self, role: Role, result: VerifyResult<()>) -> VerifyResult<()> {
        let mut state = self.state.lock().await;
        match result {
            Ok(()) => {
                info!(role = %role, "submission accepted");
                state.screen.show_success()
            }
            Err(e) => {
                warn!(role = %role, error = %e, "submission failed");
                state.notify_error(&e);
                Err(e)
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn participant_state() -> FlowState {
        let mut screen = ScreenController::new();
        screen.show_form(Role::Participant).unwrap();
        FlowState {
            screen,
            session: Some(VerificationSession::new("TOK123", Role::Participant).unwrap()),
        }
    }

    #[test]
    fn test_participant_refused_while_ingesting() {
        let mut state = participant_state();
        let form = ParticipantForm::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());

        state.session.as_mut().unwrap().begin_selection();
        assert!(matches!(
            state.prepare_participant(&form),
            Err(VerifyError::IngestionPending)
        ));

        state.session.as_mut().unwrap().clear_file();
        assert!(matches!(
            state.prepare_participant(&form),
            Err(VerifyError::MissingDocument)
        ));
    }

    #[test]
    fn test_wrong_form_has_no_notice() {
        let mut state = participant_state();
        let err = state
            .prepare_employer(&EmployerForm::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()))
            .unwrap_err();
        assert!(matches!(err, VerifyError::InvalidTransition { .. }));

        state.notify_error(&err);
        assert!(state.screen.notice().is_none());
    }
}
