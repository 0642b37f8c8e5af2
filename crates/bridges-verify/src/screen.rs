//! Display state machine.
//!
//! ```text
//! Loading ──► Error                  (terminal)
//!    │
//!    ├──► ParticipantForm ──► Success (terminal)
//!    └──► EmployerForm    ──► Success
//! ```
//!
//! A failed submission leaves the form active and raises a notice instead.

use tracing::{debug, info};

use crate::error::{UserMessage, VerifyError, VerifyResult};
use crate::types::Role;

/// The active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Error(UserMessage),
    ParticipantForm,
    EmployerForm,
    Success,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error(_) => "error",
            Self::ParticipantForm => "participant-form",
            Self::EmployerForm => "employer-form",
            Self::Success => "success",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error(_) | Self::Success)
    }

    /// Role whose form this screen shows, if any.
    pub fn form_role(&self) -> Option<Role> {
        match self {
            Self::ParticipantForm => Some(Role::Participant),
            Self::EmployerForm => Some(Role::Employer),
            _ => None,
        }
    }

    fn form_for(role: Role) -> Option<Self> {
        match role {
            Role::Participant => Some(Self::ParticipantForm),
            Role::Employer => Some(Self::EmployerForm),
            Role::Unknown => None,
        }
    }
}

/// Owns the active screen and the transient form notice.
#[derive(Debug, Clone)]
pub struct ScreenController {
    current: Screen,
    notice: Option<String>,
}

impl Default for ScreenController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenController {
    pub fn new() -> Self {
        Self {
            current: Screen::Loading,
            notice: None,
        }
    }

    pub fn current(&self) -> &Screen {
        &self.current
    }

    /// Transient message shown over the active form.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Loading → Error.
    pub fn show_error(&mut self, message: UserMessage) -> VerifyResult<()> {
        self.require_loading("error")?;
        info!(title = %message.title, "showing error screen");
        self.enter(Screen::Error(message));
        Ok(())
    }

    /// Loading → the form matching `role`.
    pub fn show_form(&mut self, role: Role) -> VerifyResult<()> {
        let target = Screen::form_for(role).ok_or(VerifyError::UnknownRole {
            request_type: Some(role.to_string()),
        })?;
        self.require_loading(target.name())?;
        info!(screen = target.name(), "showing form");
        self.enter(target);
        Ok(())
    }

    /// Form → Success.
    pub fn show_success(&mut self) -> VerifyResult<()> {
        if self.current.form_role().is_none() {
            return Err(self.invalid("success"));
        }
        info!(from = self.current.name(), "verification submitted");
        self.enter(Screen::Success);
        Ok(())
    }

    /// Raise a notice on the active form without leaving it.
    pub fn notify(&mut self, message: impl Into<String>) -> VerifyResult<()> {
        if self.current.form_role().is_none() {
            return Err(self.invalid("notice"));
        }
        let message = message.into();
        debug!(screen = self.current.name(), notice = %message, "form notice");
        self.notice = Some(message);
        Ok(())
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn require_loading(&self, to: &str) -> VerifyResult<()> {
        if self.current == Screen::Loading {
            Ok(())
        } else {
            Err(self.invalid(to))
        }
    }

    fn invalid(&self, to: &str) -> VerifyError {
        VerifyError::InvalidTransition {
            from: self.current.name().to_string(),
            to: to.to_string(),
        }
    }

    fn enter(&mut self, screen: Screen) {
        self.notice = None;
        self.current = screen;
    }
}
