//! The checkout submission state machine.
//!
//! Every transition is a synchronous method on [`CheckoutController`]; the only suspension point, the
//! payment request, happens between [`CheckoutController::begin_submission`] and
//! [`CheckoutController::complete_submission`] and is driven by [`submit`].
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::domain::{Field, FormFields, PaymentDetails, SubmissionResult, UiState};
use crate::payment_client::{PaymentClient, PaymentResponse, RequestError};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Payment submitted successfully!";
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

enum Phase {
    Idle,
    Submitting(InFlight),
    SubmittedOk {
        message: String,
        result: SubmissionResult,
    },
    SubmittedError {
        message: String,
    },
}

struct InFlight {
    submission_id: Uuid,
    details: PaymentDetails,
    cancel: oneshot::Sender<()>,
}

/// A request the caller has to send on behalf of the controller.
#[derive(Debug)]
pub struct PendingPayment {
    pub submission_id: Uuid,
    pub details: PaymentDetails,
    cancelled: oneshot::Receiver<()>,
}

#[derive(Debug)]
pub enum BeginSubmission {
    Started(PendingPayment),
    /// A field was empty; the state now carries the validation message.
    Invalid,
    /// A request is already in flight; nothing changed.
    AlreadyInFlight,
}

pub struct CheckoutController {
    fields: FormFields,
    phase: Phase,
}

impl Default for CheckoutController {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutController {
    pub fn new() -> Self {
        Self {
            fields: FormFields::default(),
            phase: Phase::Idle,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn ui_state(&self) -> UiState {
        match &self.phase {
            Phase::Idle => UiState::Idle,
            Phase::Submitting(_) => UiState::Submitting,
            Phase::SubmittedOk { message, result } => UiState::SubmittedOk {
                message: message.clone(),
                result: result.clone(),
            },
            Phase::SubmittedError { message } => UiState::SubmittedError {
                message: message.clone(),
            },
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    /// Never touches the UI state: an error stays visible while the payer corrects the input.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value.into());
    }

    #[tracing::instrument(
        name = "Begin a checkout submission",
        skip(self),
        fields(payer_email = %self.fields.email, amount = %self.fields.amount)
    )]
    pub fn begin_submission(&mut self) -> BeginSubmission {
        if self.is_in_flight() {
            tracing::info!("A payment request is already in flight, ignoring the submission");
            return BeginSubmission::AlreadyInFlight;
        }
        let details = match PaymentDetails::try_from(&self.fields) {
            Ok(details) => details,
            Err(e) => {
                self.phase = Phase::SubmittedError {
                    message: e.to_string(),
                };
                return BeginSubmission::Invalid;
            }
        };
        let submission_id = Uuid::new_v4();
        let (cancel, cancelled) = oneshot::channel();
        // replacing the phase drops any earlier message or submission result
        self.phase = Phase::Submitting(InFlight {
            submission_id,
            details: details.clone(),
            cancel,
        });
        BeginSubmission::Started(PendingPayment {
            submission_id,
            details,
            cancelled,
        })
    }

    /// Applies the outcome of the request started under `submission_id`.
    ///
    /// Returns `false`, leaving everything as it is, when that submission is no longer in flight
    /// (it was cancelled or superseded).
    #[tracing::instrument(name = "Complete a checkout submission", skip(self, outcome))]
    pub fn complete_submission(
        &mut self,
        submission_id: Uuid,
        outcome: Result<PaymentResponse, RequestError>,
    ) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Submitting(in_flight) if in_flight.submission_id == submission_id => {
                self.phase = match outcome {
                    Ok(response) => {
                        self.fields.clear();
                        Phase::SubmittedOk {
                            message: response
                                .message
                                .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.into()),
                            result: in_flight.details.into(),
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            error.cause_chain = ?e,
                            timed_out = e.is_timeout(),
                            "The payment request failed"
                        );
                        Phase::SubmittedError {
                            message: e.message().unwrap_or(DEFAULT_ERROR_MESSAGE).to_string(),
                        }
                    }
                };
                true
            }
            other => {
                self.phase = other;
                tracing::warn!("Discarding the outcome of a submission that is no longer in flight");
                false
            }
        }
    }

    /// Aborts the in-flight request, if any, and goes back to editing with the input preserved.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Submitting(in_flight) => {
                tracing::info!(submission_id = %in_flight.submission_id, "Cancelling the payment request");
                // the receiver is gone if the request already finished
                let _ = in_flight.cancel.send(());
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Cancels `submission_id` only if it is still the request in flight.
    fn abandon(&mut self, submission_id: Uuid) -> bool {
        let is_current = matches!(
            &self.phase,
            Phase::Submitting(in_flight) if in_flight.submission_id == submission_id
        );
        is_current && self.cancel()
    }

    /// Leaves the success view for a fresh, empty form.
    pub fn start_new_checkout(&mut self) -> bool {
        if matches!(self.phase, Phase::SubmittedOk { .. }) {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }
}

/// Runs one submission against `payment_client` and returns the state it settled in.
///
/// The lock is only held for the synchronous transitions, never across the request, so a concurrent
/// caller sees `Submitting` and cannot start a second request.
#[tracing::instrument(name = "Submit the checkout form", skip_all)]
pub async fn submit(controller: &Mutex<CheckoutController>, payment_client: &PaymentClient) -> UiState {
    let begin = lock(controller).begin_submission();
    let PendingPayment {
        submission_id,
        details,
        cancelled,
    } = match begin {
        BeginSubmission::Started(pending) => pending,
        BeginSubmission::Invalid | BeginSubmission::AlreadyInFlight => {
            return lock(controller).ui_state()
        }
    };
    // a caller may drop this future (timeout, task abort); the controller must not stay `Submitting`
    let mut abandon_guard = AbandonOnDrop {
        controller,
        submission_id,
        armed: true,
    };

    let outcome = tokio::select! {
        outcome = payment_client.process_payment(&details, submission_id) => outcome,
        _ = cancelled => {
            abandon_guard.armed = false;
            tracing::info!(%submission_id, "Payment request dropped after cancellation");
            return lock(controller).ui_state();
        }
    };
    abandon_guard.armed = false;

    let mut controller = lock(controller);
    controller.complete_submission(submission_id, outcome);
    controller.ui_state()
}

struct AbandonOnDrop<'a> {
    controller: &'a Mutex<CheckoutController>,
    submission_id: Uuid,
    armed: bool,
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed && lock(self.controller).abandon(self.submission_id) {
            tracing::warn!(
                submission_id = %self.submission_id,
                "The submission was dropped before its outcome arrived, back to editing"
            );
        }
    }
}

/// Transitions never panic halfway, so a poisoned lock still guards a consistent controller.
pub fn lock(controller: &Mutex<CheckoutController>) -> MutexGuard<'_, CheckoutController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}
