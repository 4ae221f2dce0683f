//! Server startup.

use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;

use super::{router::create_router, signal::shutdown_signal, state::AppState};
use crate::{config::ServerConfig, error::ServerError};

/// Bind the configured address and serve until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    let state = Arc::new(AppState::in_memory());

    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
///
/// Open chat sessions are told to close as soon as `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let chat = state.chat.clone();
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            chat.shutdown();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
