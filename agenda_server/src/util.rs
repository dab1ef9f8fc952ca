use std::sync::Arc;

use agenda_core::appointments::SchedulingResult;
use axum::http::StatusCode;
use log::error;

use crate::{error::ErrorServer, state::ServerState};

/// Runs a scheduler call on the blocking pool. sled I/O and the scheduler's
/// write lock must not park the async workers.
pub async fn run_blocking<T, F>(server_state: &Arc<ServerState>, call: F) -> Result<T, ErrorServer>
where
    T: Send + 'static,
    F: FnOnce(&ServerState) -> SchedulingResult<T> + Send + 'static,
{
    let server_state = Arc::clone(server_state);

    let result = tokio::task::spawn_blocking(move || call(&server_state))
        .await
        .map_err(|e| {
            error!("Scheduler task failed: {}", e);
            ErrorServer {
                status: StatusCode::INTERNAL_SERVER_ERROR.into(),
                message: "Internal Server Error".to_string(),
            }
        })?;

    Ok(result?)
}
