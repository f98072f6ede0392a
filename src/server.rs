//! Transport glue.
//!
//! # Responsibilities
//! - Bind the dispatch core to an HTTP listener via an axum catch-all route
//! - Buffer request bodies before entering the synchronous lifecycle
//! - Wire up HTTP tracing middleware and graceful shutdown
//!
//! # Design Decisions
//! - The framework's own routing table decides everything; axum only carries
//!   bytes in and out
//! - Shutdown propagates through the app's broadcast so the session sweeper
//!   stops with the listener

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::response::Response as AxumResponse;
use axum::routing::any;
use axum::Router;
use http::{Request, StatusCode};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::app::App;

/// Largest request body the glue will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Accept connections on `listener` until ctrl-c.
pub async fn serve(app: Arc<App>, listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "server starting");

    let router = Router::new()
        .route("/{*path}", any(entry))
        .route("/", any(entry))
        .with_state(app.clone())
        .layer(TraceLayer::new_for_http());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(app))
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn entry(State(app): State<Arc<App>>, request: Request<Body>) -> AxumResponse {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "request body exceeds the buffer cap");
            let mut response = AxumResponse::new(Body::from("Payload Too Large"));
            *response.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
            return response;
        }
    };
    let request = Request::from_parts(parts, bytes);
    app.dispatch(request).await.map(Body::from)
}

async fn shutdown_signal(app: Arc<App>) {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install ctrl-c handler");
    }
    tracing::info!("shutdown signal received");
    app.shutdown().trigger();
}
