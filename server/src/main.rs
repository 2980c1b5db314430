use clap::Parser;
use log::info;
use tokio::net::TcpListener;

use todo_server::{logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _logger = logging::init_logging(&config.log_level)?;

    let store = config.open_store()?;
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    info!(
        "event=listen status=ok addr={addr} mode={:?} create_rule={:?} database={}",
        config.mode, config.create_rule, config.database
    );
    info!("event=listen status=ok health=http://{addr}/api/health");

    let app = todo_server::app(store, config.settings());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=shutdown status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=shutdown status=error error={err}");
        std::future::pending::<()>().await;
    }
}
