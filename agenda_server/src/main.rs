mod appointments;
mod directory;
mod docs;
mod error;
mod extract;
mod info;
mod router;
mod state;
mod util;

use std::{env, sync::Arc};

use agenda_core::appointments::{Scheduler, SledStore};
use anyhow::Context;
use dotenvy::dotenv;
use log::info;
use router::router;
use state::ServerState;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let server_domain = env::var("SERVER_DOMAIN").unwrap_or("0.0.0.0:3030".to_string());
    let sled_url = env::var("SLED_URL").unwrap_or("agenda_db".to_string());

    let db = sled::open(&sled_url)
        .with_context(|| format!("Failed to open sled database at {}", sled_url))?;
    let store = SledStore::new(db).context("Failed to open appointment trees")?;

    let state = Arc::new(ServerState::from(Scheduler::from(store)));

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&server_domain)
        .await
        .with_context(|| format!("Failed to bind {}", server_domain))?;

    info!("Server running on http://{}", server_domain);

    axum::serve(listener, app).await?;

    Ok(())
}
