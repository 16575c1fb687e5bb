use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::engine::refresh::{place_drivers, refresh_fares, select_driver, FareRun};
use crate::error::AppError;
use crate::models::driver::{Driver, DriverId};
use crate::state::AppState;
use crate::store::DriverState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(list_drivers).post(set_drivers))
        .route("/drivers/refresh", post(refresh_drivers))
        .route(
            "/drivers/selected",
            put(set_selected_driver).delete(clear_selected_driver),
        )
        .route("/fares", post(estimate))
}

#[derive(Deserialize)]
pub struct SetDriversRequest {
    pub drivers: Vec<Driver>,
}

#[derive(Deserialize)]
pub struct SelectDriverRequest {
    pub driver_id: DriverId,
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<DriverState> {
    Json(state.drivers.read().await.clone())
}

async fn set_drivers(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SetDriversRequest>,
) -> Result<Json<DriverState>, AppError> {
    Ok(Json(place_drivers(&state, payload.drivers).await?))
}

async fn refresh_drivers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DriverState>, AppError> {
    let drivers = state.backend.fetch_drivers().await?;
    Ok(Json(place_drivers(&state, drivers).await?))
}

async fn set_selected_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SelectDriverRequest>,
) -> Result<Json<DriverState>, AppError> {
    Ok(Json(select_driver(&state, Some(payload.driver_id)).await?))
}

async fn clear_selected_driver(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DriverState>, AppError> {
    Ok(Json(select_driver(&state, None).await?))
}

async fn estimate(State(state): State<Arc<AppState>>) -> Result<Json<FareRun>, AppError> {
    Ok(Json(refresh_fares(&state).await?))
}
