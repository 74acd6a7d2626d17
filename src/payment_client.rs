use std::fmt::{Debug, Formatter};

use anyhow::Context;
use reqwest::{Client, StatusCode, Url};
use uuid::Uuid;

use crate::domain::PaymentDetails;
use crate::error_handling::error_chain_fmt;

#[derive(Debug)]
pub struct PaymentClient {
    http_client: Client,
    endpoint: Url,
}

/// What the endpoint said about an accepted payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentResponse {
    pub message: Option<String>,
}

#[derive(thiserror::Error)]
pub enum RequestError {
    #[error("The payment endpoint rejected the request with status {status}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("Failed to reach the payment endpoint")]
    Transport(#[from] reqwest::Error),
}

impl RequestError {
    /// The text the endpoint sent along with a rejection, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            RequestError::Rejected { message, .. } => message.as_deref(),
            RequestError::Transport(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RequestError::Transport(e) if e.is_timeout())
    }
}

impl Debug for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl PaymentClient {
    pub fn new(
        base_url: String,
        endpoint_path: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, anyhow::Error> {
        let endpoint = Url::parse(&base_url)
            .with_context(|| format!("Failed to parse {} as the payment base url", base_url))?
            .join(endpoint_path)
            .with_context(|| format!("Failed to join {} with the payment base url", endpoint_path))?;
        // the timeout bounds every request, a hung endpoint surfaces as a transport error
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the payment HTTP client")?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POSTs `{ email, amount }` to the payment endpoint.
    ///
    /// `submission_id` travels as the `Idempotency-Key` header so the endpoint can recognise a replay.
    /// Non-2xx responses come back as [`RequestError::Rejected`] with the body's `message`, if it has one.
    #[tracing::instrument(
        name = "Process a payment",
        skip(self, details),
        fields(payer_email = %details.email(), amount = %details.amount())
    )]
    pub async fn process_payment(
        &self,
        details: &PaymentDetails,
        submission_id: Uuid,
    ) -> Result<PaymentResponse, RequestError> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header("Idempotency-Key", submission_id.to_string())
            .json(details)
            .send()
            .await?;
        // `send` only fails on transport problems, the status has to be checked by hand
        let status = response.status();
        let body = response.bytes().await?;
        let message = message_from_body(&body);
        if status.is_success() {
            Ok(PaymentResponse { message })
        } else {
            Err(RequestError::Rejected { status, message })
        }
    }
}

#[derive(serde::Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// Best-effort extraction of `{ "message": "..." }`; anything else counts as no message.
fn message_from_body(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<MessageBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
}
