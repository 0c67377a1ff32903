use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod error;
mod handlers;
pub mod logic;
pub mod rooms;
pub mod state;

pub use error::ServerError;
pub use state::{AppState, DEFAULT_ROOM};

use crate::handlers::{health_handler, ws_handler};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ServerError> {
    axum::serve(listener, router(state))
        .await
        .map_err(ServerError::Serve)
}
