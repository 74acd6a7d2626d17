use std::collections::HashMap;
use std::future::{ready, Ready};
use std::sync::{Arc, Mutex, PoisonError};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::error::ErrorInternalServerError;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::checkout::CheckoutController;

pub const SESSION_COOKIE: &str = "checkout_session";

/// One checkout controller per browser, keyed by the session cookie.
#[derive(Default)]
pub struct CheckoutSessions {
    controllers: Mutex<HashMap<Uuid, Arc<Mutex<CheckoutController>>>>,
}

impl CheckoutSessions {
    /// Looks up the controller for `session_id`, starting a fresh session when the id is missing or
    /// unknown. Ids are only ever minted here, never taken from the client.
    pub fn open(&self, session_id: Option<Uuid>) -> CheckoutSession {
        let mut controllers = self
            .controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = session_id {
            if let Some(controller) = controllers.get(&id) {
                return CheckoutSession {
                    id,
                    is_new: false,
                    controller: Arc::clone(controller),
                };
            }
        }
        let id = Uuid::new_v4();
        let controller = Arc::new(Mutex::new(CheckoutController::new()));
        controllers.insert(id, Arc::clone(&controller));
        tracing::info!(session_id = %id, "Started a new checkout session");
        CheckoutSession {
            id,
            is_new: true,
            controller,
        }
    }

    pub fn len(&self) -> usize {
        self.controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct CheckoutSession {
    id: Uuid,
    is_new: bool,
    controller: Arc<Mutex<CheckoutController>>,
}

impl CheckoutSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn controller(&self) -> &Mutex<CheckoutController> {
        &self.controller
    }

    /// Hands the session cookie to the browser the first time it shows up.
    pub fn attach(&self, mut response: HttpResponse) -> HttpResponse {
        if self.is_new {
            let cookie = Cookie::build(SESSION_COOKIE, self.id.to_string())
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish();
            if let Err(e) = response.add_cookie(&cookie) {
                tracing::error!(error.cause_chain = ?e, "Failed to set the checkout session cookie");
            }
        }
        response
    }
}

/// Allows `CheckoutSession` to be used as an actix_web extractor.
impl FromRequest for CheckoutSession {
    type Error = actix_web::Error;
    // no I/O involved, so the future is ready immediately
    type Future = Ready<Result<CheckoutSession, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let sessions = match req.app_data::<web::Data<CheckoutSessions>>() {
            Some(sessions) => sessions,
            None => {
                return ready(Err(ErrorInternalServerError(
                    "Checkout sessions are not configured",
                )))
            }
        };
        let session_id = req
            .cookie(SESSION_COOKIE)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
        ready(Ok(sessions.open(session_id)))
    }
}
