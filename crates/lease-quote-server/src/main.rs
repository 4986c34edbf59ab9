use anyhow::Result;
use lease_quote_server::config::{LoggingSettings, Settings};
use lease_quote_server::Application;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new()?;
    init_tracing(&settings.logging);

    info!(
        environment = %settings.application.environment,
        vat_rate = %settings.engine.vat_rate,
        "Starting lease quote service"
    );

    let app = Application::build(&settings).await?;
    app.run().await?;

    Ok(())
}
