pub mod drivers;
pub mod location;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::geo::coordinate_is_set;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(location::router())
        .merge(drivers::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    drivers: usize,
    user_set: bool,
    destination_set: bool,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (user, destination) = {
        let location = state.location.read().await;
        (location.user(), location.destination())
    };
    let drivers = state.drivers.read().await.drivers().len();

    Json(HealthResponse {
        status: "ok",
        drivers,
        user_set: coordinate_is_set(user.as_ref()),
        destination_set: coordinate_is_set(destination.as_ref()),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
