//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum app with a single catch-all handler
//! - Wire up middleware (tracing, request ID)
//! - Serve connections until shutdown is signalled
//! - Record per-request logs and metrics

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::DevServerConfig;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::routing::SiteRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<SiteRouter>,
}

/// HTTP server for one served directory.
pub struct HttpServer {
    router: Router,
    config: DevServerConfig,
}

impl HttpServer {
    /// Create a server resolving requests with `site`.
    pub fn new(config: DevServerConfig, site: Arc<SiteRouter>) -> Self {
        let router = Self::build_router(AppState { site });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);
        Router::new()
            .fallback(site_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The app, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &DevServerConfig {
        &self.config
    }

    /// Serve on `listener` until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve every request, whatever its method or path.
async fn site_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "srv"
    );

    match state.site.route(request.uri()).await {
        Ok(resolution) => {
            let outcome = resolution.outcome();
            let response = resolution.into_response();
            tracing::debug!(
                request_id = %request_id,
                outcome,
                status = response.status().as_u16(),
                "Request resolved"
            );
            metrics::record_request(outcome, response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            let response = e.into_response();
            metrics::record_request("error", response.status().as_u16(), start_time);
            response
        }
    }
}
