pub mod checkout;
pub mod configuration;
pub mod domain;
mod error_handling;
pub mod payment_client;
pub mod routes;
mod routing_helpers;
pub mod session_state;
pub mod startup;
pub mod telemetry;
pub mod view;
