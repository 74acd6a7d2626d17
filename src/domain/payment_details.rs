use crate::domain::{FormFields, SubmissionResult};

/// A submission that passed validation; serialized as the request body `{ email, amount }`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PaymentDetails {
    email: String,
    amount: String,
}

impl PaymentDetails {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

impl From<PaymentDetails> for SubmissionResult {
    fn from(details: PaymentDetails) -> Self {
        Self {
            email: details.email,
            amount: details.amount,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Please fill in all fields")]
pub struct InvalidPaymentDetails;

impl TryFrom<&FormFields> for PaymentDetails {
    type Error = InvalidPaymentDetails;

    fn try_from(fields: &FormFields) -> Result<Self, Self::Error> {
        // only presence is checked; format is the endpoint's call
        if fields.email.is_empty() || fields.amount.is_empty() {
            return Err(InvalidPaymentDetails);
        }
        Ok(Self {
            email: fields.email.clone(),
            amount: fields.amount.clone(),
        })
    }
}
