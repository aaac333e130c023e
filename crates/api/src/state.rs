use std::sync::Arc;

use pulse_events::HubHandle;
use pulse_worker::{JobIdSequence, JobPool};
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pulse_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bounded job dispatch pool.
    pub jobs: Arc<JobPool>,
    /// Id source shared by API submissions and the demo job feeder.
    pub job_ids: JobIdSequence,
    /// Front door to the broadcast hub.
    pub hub: HubHandle,
    /// Fired once the server starts shutting down; open WebSocket
    /// connections close when it does.
    pub shutdown: CancellationToken,
}
