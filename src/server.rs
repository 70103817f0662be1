//! Composition root and server lifecycle: compose → listen → drain → post-stop.

use crate::error::StartupError;
use crate::plugin::{resolve_order, Plugin, ServerBuilder};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    pub max_body_bytes: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        ServerOptions {
            max_body_bytes: 64 * 1024,
        }
    }
}

/// A fully composed server: plugins registered, state built, router ready.
pub struct Server {
    router: Router,
    state: AppState,
    /// Registration order; post-stop hooks run in reverse.
    plugins: Vec<Box<dyn Plugin>>,
}

impl Server {
    /// Register plugins in dependency order and build shared state.
    /// If a registration fails, plugins already registered are stopped before the error is returned.
    pub async fn compose(plugins: Vec<Box<dyn Plugin>>, options: ServerOptions) -> Result<Self, StartupError> {
        let plugins = resolve_order(plugins)?;
        let mut builder = ServerBuilder::new();
        for (registered, plugin) in plugins.iter().enumerate() {
            tracing::debug!(plugin = plugin.name(), "registering plugin");
            if let Err(e) = plugin.register(&mut builder).await {
                tracing::error!(plugin = plugin.name(), error = %e, "plugin registration failed");
                if let Some(store) = builder.store() {
                    let state = AppState::new(store.clone());
                    run_post_stop(&plugins[..registered], &state).await;
                }
                return Err(e);
            }
        }

        let (store, routes) = builder.into_parts();
        let store = store.ok_or(StartupError::MissingState("a user store"))?;
        let state = AppState::new(store);
        let router = routes
            .with_state(state.clone())
            .layer(DefaultBodyLimit::max(options.max_body_bytes))
            .layer(RequestBodyLimitLayer::new(options.max_body_bytes))
            .layer(TraceLayer::new_for_http());
        tracing::info!(
            plugins = ?plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "server composed"
        );
        Ok(Server { router, state, plugins })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind `addr` and serve until `shutdown` resolves. A bind failure still runs post-stop hooks.
    pub async fn listen<F>(self, addr: SocketAddr, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match TcpListener::bind(addr).await {
            Ok(listener) => self.serve(listener, shutdown).await,
            Err(source) => {
                self.stop().await;
                Err(StartupError::Bind {
                    addr: addr.to_string(),
                    source,
                })
            }
        }
    }

    /// Serve on `listener`. When `shutdown` resolves the listener stops accepting, in-flight
    /// requests drain, and only then do post-stop hooks run (once).
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("listening on http://{}", addr);
        }
        let result = axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(shutdown)
            .await;
        tracing::info!("listener stopped");
        self.stop().await;
        result.map_err(StartupError::Serve)
    }

    async fn stop(self) {
        run_post_stop(&self.plugins, &self.state).await;
    }
}

/// Failures are logged and not retried; the remaining hooks still run.
async fn run_post_stop(plugins: &[Box<dyn Plugin>], state: &AppState) {
    for plugin in plugins.iter().rev() {
        if let Err(e) = plugin.on_post_stop(state).await {
            tracing::error!(plugin = plugin.name(), error = %e, "post-stop hook failed");
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining");
}
