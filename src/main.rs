//! Sentio - A terminal dashboard for trading signals, positions and profits.

use sentio::{App, Config, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file; the terminal belongs to the UI
    let log_dir = sentio::config::log_dir()?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "sentio.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentio=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    // Load configuration
    let config = Config::load_or_default()?;
    tracing::info!(endpoint = %config.api.endpoint, "Starting Sentio");

    // Run the application
    let mut app = App::new(config).await?;
    app.run().await?;

    Ok(())
}
