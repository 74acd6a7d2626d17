mod form_fields;
mod payment_details;
mod ui_state;

pub use form_fields::{Field, FormFields};
pub use payment_details::{InvalidPaymentDetails, PaymentDetails};
pub use ui_state::{SubmissionResult, UiState};
