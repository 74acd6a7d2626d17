//! The read-only projection a presentation layer renders.
use crate::checkout::CheckoutController;
use crate::domain::UiState;

pub const SUBMIT_LABEL: &str = "Complete Purchase";
pub const SUBMITTING_LABEL: &str = "Processing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    /// Style key for the inline message.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutView {
    /// Confirmation panel; the form is hidden.
    Success {
        message: FormMessage,
        email: String,
        amount: String,
    },
    Form {
        email: String,
        amount: String,
        submit_label: &'static str,
        submit_disabled: bool,
        message: Option<FormMessage>,
    },
}

impl From<&CheckoutController> for CheckoutView {
    fn from(controller: &CheckoutController) -> Self {
        let state = controller.ui_state();
        if let UiState::SubmittedOk { message, result } = state {
            return CheckoutView::Success {
                message: FormMessage {
                    text: message,
                    kind: MessageKind::Success,
                },
                email: result.email,
                amount: result.amount,
            };
        }
        // with success handled, any remaining message is an error
        let message = state.message().map(|text| FormMessage {
            text: text.to_string(),
            kind: MessageKind::Error,
        });
        let submitting = state.is_submitting();
        let fields = controller.fields();
        CheckoutView::Form {
            email: fields.email.clone(),
            amount: fields.amount.clone(),
            submit_label: if submitting {
                SUBMITTING_LABEL
            } else {
                SUBMIT_LABEL
            },
            submit_disabled: submitting,
            message,
        }
    }
}
