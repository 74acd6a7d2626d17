use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::payment_client::PaymentClient;
use crate::routes::{
    cancel_checkout, checkout_page, health_check, start_new_checkout, submit_checkout,
};
use crate::routing_helpers::see_other;
use crate::session_state::CheckoutSessions;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let payment_client = configuration.payment_client.client()?;
        tracing::info!(endpoint = %payment_client.endpoint(), "Payments go to the configured endpoint");

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        // port 0 asks the OS for a free port, so read back the one we got
        let port = listener.local_addr()?.port();
        let server = run(listener, payment_client)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

/// Every browser gets its own checkout controller, shared across workers through the session cookie.
pub fn run(listener: TcpListener, payment_client: PaymentClient) -> Result<Server, std::io::Error> {
    let sessions = web::Data::new(CheckoutSessions::default());
    let payment_client = web::Data::new(payment_client);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/", web::get().to(|| async { see_other("/checkout") }))
            .route("/health_check", web::get().to(health_check))
            .route("/checkout", web::get().to(checkout_page))
            .route("/checkout", web::post().to(submit_checkout))
            .route("/checkout/cancel", web::post().to(cancel_checkout))
            .route("/checkout/new", web::post().to(start_new_checkout))
            .app_data(sessions.clone())
            .app_data(payment_client.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
