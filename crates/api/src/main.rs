use std::net::SocketAddr;
use std::sync::Arc;

use pulse_agent::{MetricsSource, SystemCollector};
use pulse_events::BroadcastHub;
use pulse_worker::{JobIdSequence, JobPool, SimulatedWork};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse_api::background;
use pulse_api::config::ServerConfig;
use pulse_api::router::build_app_router;
use pulse_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pulse_api=debug,pulse_worker=info,pulse_events=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    config.validate().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = pulse_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    pulse_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    pulse_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Job pool ---
    let jobs = Arc::new(JobPool::with_handler(
        config.job_workers,
        config.job_queue_capacity,
        SimulatedWork::new(config.job_duration()),
    ));
    jobs.start();
    let job_ids = JobIdSequence::new();

    // --- Broadcast hub ---
    let hub = BroadcastHub::with_mailbox_capacity(config.subscriber_mailbox);
    let hub_handle = hub.handle();
    let hub_task = tokio::spawn(hub.run());

    // --- Background tasks ---
    let cancel = CancellationToken::new();
    let metrics_source: Arc<dyn MetricsSource> = Arc::new(SystemCollector::new());

    let background_tasks: Vec<(&'static str, JoinHandle<()>)> = vec![
        (
            "job_status",
            tokio::spawn(background::job_status::run(
                Arc::clone(&jobs),
                hub_handle.clone(),
                config.broadcast_interval(),
                cancel.clone(),
            )),
        ),
        (
            "system_metrics",
            tokio::spawn(background::system_metrics::run(
                Arc::clone(&metrics_source),
                hub_handle.clone(),
                config.broadcast_interval(),
                cancel.clone(),
            )),
        ),
        (
            "metrics_persistence",
            tokio::spawn(background::metrics_persistence::run(
                pool.clone(),
                Arc::clone(&metrics_source),
                config.metrics_persist_interval(),
                cancel.clone(),
            )),
        ),
        (
            "metrics_retention",
            tokio::spawn(background::metrics_retention::run(
                pool.clone(),
                config.metrics_retention_hours,
                cancel.clone(),
            )),
        ),
        (
            "health_monitor",
            tokio::spawn(background::health_monitor::run(
                pool.clone(),
                Arc::clone(&jobs),
                hub_handle.clone(),
                config.health_check_interval(),
                cancel.clone(),
            )),
        ),
        (
            "demo_jobs",
            tokio::spawn(background::demo_jobs::run(
                Arc::clone(&jobs),
                job_ids.clone(),
                config.demo_job_count,
                config.demo_job_interval(),
                cancel.clone(),
            )),
        ),
    ];
    tracing::info!(count = background_tasks.len(), "Background tasks started");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        jobs: Arc::clone(&jobs),
        job_ids,
        hub: hub_handle.clone(),
        shutdown: cancel.clone(),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let deadline = config.shutdown_timeout();

    // Producers and open WebSocket connections watch this token.
    cancel.cancel();
    for (name, handle) in background_tasks {
        match tokio::time::timeout(deadline, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(task = name, error = %e, "Background task failed"),
            Err(_) => tracing::warn!(task = name, "Background task did not stop in time"),
        }
    }
    tracing::info!("Background tasks stopped");

    if tokio::time::timeout(deadline, jobs.stop()).await.is_err() {
        tracing::error!(
            timeout_secs = deadline.as_secs(),
            "Job pool did not stop within the shutdown deadline",
        );
    } else {
        tracing::info!("Job pool stopped");
    }

    // The dispatch loop exits once the last handle is gone.
    drop(hub_handle);
    match tokio::time::timeout(deadline, hub_task).await {
        Ok(_) => tracing::info!("Broadcast hub stopped"),
        Err(_) => tracing::warn!("Broadcast hub still has live handles; abandoning"),
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
