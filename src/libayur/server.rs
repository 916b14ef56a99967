use std::sync::Arc;

use log::{info, warn};
use tokio::{net::TcpListener, signal};

use crate::{
    config::Args,
    error::StartupError,
    routes::{cors, router},
    state::AppState,
};

pub async fn start_server(args: Args) -> Result<(), StartupError> {
    info!("[Setup] Initializing state...");
    let state = AppState::load(&args)?;

    serve(args, state).await
}

pub async fn serve(args: Args, state: Arc<AppState>) -> Result<(), StartupError> {
    let app = router(state).layer(cors(args.origins()?));

    let address = args.address();
    info!("[Server] Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("[Server] Running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("[Server] Shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("[Server] Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("[Server] Cannot listen for Ctrl+C: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("[Server] Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("[Server] Cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
