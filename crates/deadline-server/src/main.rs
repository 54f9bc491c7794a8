//! deadline: assignment deadline extraction server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use deadline_core::ServiceConfig;
use deadline_server::{build_router, cli, AppState};

fn resolve_data_dir() -> PathBuf {
    std::env::var("DEADLINE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "tag" => {
                let config = ServiceConfig::from_env(resolve_data_dir())?;
                let path = args.get(2).map(PathBuf::from);
                return cli::run_tag(path.as_deref(), config.recognizer);
            }
            "--help" | "-h" | "help" => {
                cli::print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'deadline help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = ServiceConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Deadline server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
