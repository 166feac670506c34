use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use video_watch::{
    app_state::AppState,
    config::AppConfig,
    routes,
    services::{
        ledger::{InMemoryLedger, ProcessedJobLedger, RedisJobLedger},
        messenger::MessengerClient,
        rekognition::RekognitionClient,
        sns::SubscriptionConfirmer,
    },
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Missing configuration is fatal at startup
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!(region = %config.region, bucket = %config.s3_bucket_name, "Initializing video-watch");

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);
    routes::metrics::describe();

    tracing::info!("Loading AWS configuration");
    let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()))
        .load()
        .await;
    let detector = RekognitionClient::new(&sdk_config);

    tracing::info!("Initializing Messenger client");
    let messenger = MessengerClient::new(&config.graph_api_url, &config.fb_messenger_access_token)
        .expect("Failed to initialize Messenger client");

    let ledger: Arc<dyn ProcessedJobLedger> = match config.redis_url.as_deref() {
        Some(redis_url) => {
            tracing::info!("Connecting to Redis processed-job ledger");
            Arc::new(
                RedisJobLedger::new(redis_url, config.processed_job_ttl_secs)
                    .expect("Failed to initialize Redis ledger"),
            )
        }
        None => {
            tracing::warn!("REDIS_URL not set, notifications are only deduplicated per process");
            Arc::new(InMemoryLedger::new(Duration::from_secs(
                config.processed_job_ttl_secs,
            )))
        }
    };

    let confirmer = SubscriptionConfirmer::new(reqwest::Client::new());
    let bind_addr = config.bind_addr.clone();

    let state = AppState::new(
        config,
        Arc::new(detector),
        Arc::new(messenger),
        ledger,
        confirmer,
    );

    let app = routes::router(state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(1024 * 1024));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
