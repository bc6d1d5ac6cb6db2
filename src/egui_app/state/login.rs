/// UI state for the sign-in window shown while no session is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginUiState {
    /// Email input.
    pub email: String,
    /// Password input.
    pub password: String,
    /// Whether to focus the email field on the next frame.
    pub focus_email_requested: bool,
    /// True while the sign-in call is in flight.
    pub signing_in: bool,
    /// Last sign-in error, shown inline.
    pub last_error: Option<String>,
}

impl LoginUiState {
    /// Both fields filled and no call in flight.
    pub fn can_submit(&self) -> bool {
        !self.signing_in && !self.email.trim().is_empty() && !self.password.is_empty()
    }

    /// Clear the form after a successful sign-in or on sign-out.
    pub fn reset(&mut self) {
        *self = Self {
            focus_email_requested: true,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_requires_both_fields() {
        let mut login = LoginUiState::default();
        assert!(!login.can_submit());
        login.email = "ada@clinic.test".into();
        assert!(!login.can_submit());
        login.password = "secret".into();
        assert!(login.can_submit());
        login.signing_in = true;
        assert!(!login.can_submit());
    }

    #[test]
    fn reset_clears_inputs_and_requests_focus() {
        let mut login = LoginUiState {
            email: "ada@clinic.test".into(),
            password: "secret".into(),
            last_error: Some("bad".into()),
            ..LoginUiState::default()
        };
        login.reset();
        assert!(login.email.is_empty());
        assert!(login.password.is_empty());
        assert!(login.last_error.is_none());
        assert!(login.focus_email_requested);
    }
}
