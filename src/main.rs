//! user-registry server: composes the database and user plugins, listens until SIGINT/SIGTERM.

use tracing_subscriber::EnvFilter;
use user_registry::{default_plugins, shutdown_signal, Server, ServerConfig, ServerOptions, StartupError};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("user_registry=info,tower_http=info")),
        )
        .init();
    exit_on_panic();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
    tracing::info!("server shutdown complete");
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    let options = ServerOptions {
        max_body_bytes: config.max_body_bytes,
    };
    let server = Server::compose(default_plugins(&config), options).await?;
    server.listen(config.addr(), shutdown_signal()).await
}

/// A panic on any task is an unhandled failure: log it and exit non-zero without draining.
fn exit_on_panic() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "unhandled failure, exiting");
        default_hook(info);
        std::process::exit(1);
    }));
}
