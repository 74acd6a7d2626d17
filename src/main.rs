use checkout_form::configuration::get_configuration;
use checkout_form::startup::Application;
use checkout_form::telemetry::{get_tracing_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_tracing_subscriber("checkout-form", "info", std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration()?;
    let application = Application::build(configuration)?;
    tracing::info!(port = application.port(), "Serving the checkout page");
    application.run_until_stopped().await?;
    Ok(())
}
