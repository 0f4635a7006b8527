extern crate anyhow;
extern crate readit_backend;
extern crate tokio;

use std::sync::Arc;

use readit_backend::config::Config;
use readit_backend::routes::{router, AppState};
use readit_backend::storage::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    readit_backend::init_logger();
    let config = Config::from_env()?;
    let addr = config.addr;
    if config.debug {
        log::warn!("debug mode, /config is exposed");
    }

    let app = router(AppState::new(Arc::new(MemoryStore::new()), config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on: {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
