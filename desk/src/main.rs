// asset-desk: list, filter, sort, export and maintain the records of the
// asset-maintenance backend from the terminal.
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod components;
mod config;
mod state;

use app::App;
use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Configuration errors are fatal; command failures are reported as notices.
    let app_config = AppConfig::load(cli.config.as_deref())?;

    // RUST_LOG wins over the configured level. Logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app_config.app.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = %app_config.version, "Starting asset-desk");

    let mut app = App::init(app_config, cli.prefs)?;
    let mut stdout = std::io::stdout();
    app.run(cli.command, &mut stdout).await
}
