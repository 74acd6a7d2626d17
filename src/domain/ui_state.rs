/// What the payer submitted, kept for the confirmation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResult {
    pub email: String,
    pub amount: String,
}

/// The state a presentation layer renders. Exactly one holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Submitting,
    SubmittedOk {
        message: String,
        result: SubmissionResult,
    },
    SubmittedError {
        message: String,
    },
}

impl UiState {
    pub fn message(&self) -> Option<&str> {
        match self {
            UiState::SubmittedOk { message, .. } | UiState::SubmittedError { message } => {
                Some(message)
            }
            UiState::Idle | UiState::Submitting => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, UiState::Submitting)
    }
}
