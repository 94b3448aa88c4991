use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report sink readiness without contacting either service.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let sheet_ready = state.recorder().is_ready().await;
    if !sheet_ready {
        warn!("spreadsheet not initialized (degraded mode)");
    }
    HealthResponse::from_sinks(sheet_ready, state.notifier().is_configured())
}
