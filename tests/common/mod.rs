//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use iris_serving::model::{IrisFeatures, PredictError, PredictFn, Predictor};
use iris_serving::{HttpServer, ServiceConfig, Shutdown};
use tokio::net::TcpListener;

/// A running server and the handle that stops it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Default config bound to an ephemeral local port.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.metrics_enabled = false;
    config
}

/// Start the server with the built-in classifier.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    start_with_predictor(config, None).await
}

/// Start the server, optionally replacing the model.
pub async fn start_with_predictor(
    config: ServiceConfig,
    predictor: Option<Arc<dyn Predictor>>,
) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = match predictor {
        Some(p) => HttpServer::with_predictor(config, p),
        None => HttpServer::new(config),
    };

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer { addr, shutdown }
}

/// Model that fails whenever sepal length exceeds `threshold`.
#[allow(dead_code)]
pub fn failing_above(threshold: f64) -> Arc<dyn Predictor> {
    Arc::new(PredictFn::new("test", move |f: &IrisFeatures| {
        if f.sepal_length > threshold {
            Err(PredictError::Backend("runner crashed".into()))
        } else {
            Ok("setosa".to_string())
        }
    }))
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
