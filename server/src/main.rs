use anyhow::Result;
use clap::Parser;
use netdash_server::{api, config};
use tracing::info;

/// Netdash: SNMP client discovery backend for the network dashboard.
#[derive(Parser, Debug)]
#[command(name = "netdash-server", version, about)]
struct Cli {
    /// Address and port to listen on.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Path to a TOML configuration file (optional).
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (logs).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netdash_server=debug,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Netdash server");

    // Load optional config file.
    let app_config = if let Some(ref path) = cli.config {
        config::AppConfig::from_file(path)?
    } else {
        config::AppConfig::default()
    };
    info!(
        walk = %app_config.snmp.walk_command,
        bulkwalk = %app_config.snmp.bulkwalk_command,
        hard_timeout_secs = app_config.snmp.hard_timeout_secs,
        "SNMP walk tools configured"
    );

    let state = api::AppState::new(app_config);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!(addr = %cli.listen, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
