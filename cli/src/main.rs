//! Contrail binary: load configuration and serve the assistant HTTP gateway.

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contrail")]
#[command(about = "contrail — flight assistant HTTP gateway")]
struct Args {
    /// Bind address (default: SERVE_ADDR or 127.0.0.1:8080)
    #[arg(long, value_name = "ADDR", env = "SERVE_ADDR")]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // .env before flag parsing so SERVE_ADDR from .env reaches clap's env fallback.
    if let Err(e) = env_config::load_and_apply(None) {
        eprintln!("warning: {}", e);
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    serve::run_serve(args.addr.as_deref()).await
}
