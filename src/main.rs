use digital_tasbih::{
    phrases::PhraseCatalog, presenter::ViewModel, router, AppState, Config, JsonFileStore, Tasbih,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    info!(path = %config.data_path.display(), target = config.target.get(), "starting");

    let tasbih = Tasbih::restore(
        PhraseCatalog::default(),
        config.target,
        config.timing,
        JsonFileStore::new(config.data_path.clone()),
        ViewModel::default(),
    );
    let app = router(AppState::new(tasbih, config.hold_idle_timeout));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
