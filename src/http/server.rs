//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, rate limits)
//! - Own the resilience guard shared by the prediction handlers
//! - Serve until the shutdown coordinator fires

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers::{health, predict_batch, predict_single, status};
use crate::http::request::UuidRequestId;
use crate::lifecycle::shutdown;
use crate::model::{CentroidClassifier, Predictor};
use crate::observability::PrometheusSink;
use crate::resilience::{CircuitBreaker, ResilienceGuard};
use crate::security::{rate_limit_middleware, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<ResilienceGuard>,
    pub model_name: Arc<str>,
}

/// HTTP server for the prediction service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server backed by the built-in centroid classifier.
    pub fn new(config: ServiceConfig) -> Self {
        let predictor = Arc::new(CentroidClassifier::from_config(&config.model));
        Self::with_predictor(config, predictor)
    }

    /// Create a server around an arbitrary prediction backend.
    pub fn with_predictor(config: ServiceConfig, predictor: Arc<dyn Predictor>) -> Self {
        let sink = Arc::new(PrometheusSink::new(predictor.version()));
        let breaker = CircuitBreaker::from_config(&config.breaker);
        let guard = Arc::new(ResilienceGuard::new(breaker, predictor, sink));

        let state = AppState {
            guard,
            model_name: Arc::from(config.model.name.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let mut single = Router::new().route("/predict_single", post(predict_single));
        let mut batch = Router::new().route("/predict_batch", post(predict_batch));

        if config.rate_limit.enabled {
            let single_limiter = Arc::new(RateLimiter::per_minute(
                "predict_single",
                config.rate_limit.single_per_minute,
            ));
            let batch_limiter = Arc::new(RateLimiter::per_minute(
                "predict_batch",
                config.rate_limit.batch_per_minute,
            ));
            single = single.route_layer(middleware::from_fn_with_state(
                single_limiter,
                rate_limit_middleware,
            ));
            batch = batch.route_layer(middleware::from_fn_with_state(
                batch_limiter,
                rate_limit_middleware,
            ));
        }

        Router::new()
            .route("/health", get(health))
            .route("/status", get(status))
            .merge(single)
            .merge(batch)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_failures = self.config.breaker.max_failures,
            recovery_timeout_secs = self.config.breaker.recovery_timeout_secs,
            rate_limit = self.config.rate_limit.enabled,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait_for(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
