use tokio::net::TcpListener;
use todo_server::{logging, AppState, Config, TodoStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init_logging()?;
    let config = Config::from_env()?;

    let store = TodoStore::open(&config.data_file);
    let listener = TcpListener::bind(config.addr()).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, todo_server::app(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        return;
    }
    info!("shutting down");
}
