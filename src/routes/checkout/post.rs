use actix_web::{web, HttpResponse};

use crate::checkout::{lock, submit};
use crate::domain::Field;
use crate::payment_client::PaymentClient;
use crate::routing_helpers::see_other;
use crate::session_state::CheckoutSession;

/// Applies every posted pair as a field-change event, then submits.
///
/// A pair naming something other than a checkout field is a 400 and nothing is applied.
#[tracing::instrument(
    name = "Handle a checkout form post",
    skip(form, session, payment_client),
    fields(
        session_id = %session.id(),
        email = tracing::field::Empty,
        amount = tracing::field::Empty
    )
)]
pub async fn submit_checkout(
    form: web::Form<Vec<(String, String)>>,
    session: CheckoutSession,
    payment_client: web::Data<PaymentClient>,
) -> HttpResponse {
    let mut changes = Vec::with_capacity(form.0.len());
    for (name, value) in form.0 {
        match name.parse::<Field>() {
            Ok(field) => changes.push((field, value)),
            Err(e) => {
                tracing::warn!(field = %name, "Rejecting a checkout post with an unknown field");
                return session.attach(HttpResponse::BadRequest().body(e));
            }
        }
    }
    {
        let mut controller = lock(session.controller());
        for (field, value) in changes {
            tracing::Span::current().record(field.as_str(), &tracing::field::display(&value));
            controller.update_field(field, value);
        }
    }
    let state = submit(session.controller(), &payment_client).await;
    tracing::info!(?state, "Checkout submission settled");
    session.attach(see_other("/checkout"))
}

#[tracing::instrument(name = "Cancel the in-flight payment", skip(session), fields(session_id = %session.id()))]
pub async fn cancel_checkout(session: CheckoutSession) -> HttpResponse {
    if !lock(session.controller()).cancel() {
        tracing::info!("Nothing to cancel");
    }
    session.attach(see_other("/checkout"))
}

#[tracing::instrument(name = "Start a new checkout", skip(session), fields(session_id = %session.id()))]
pub async fn start_new_checkout(session: CheckoutSession) -> HttpResponse {
    lock(session.controller()).start_new_checkout();
    session.attach(see_other("/checkout"))
}
