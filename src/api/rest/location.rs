use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, put};
use axum::Json;
use axum::Router;

use crate::engine::refresh::{update_location, LocationSide};
use crate::engine::region::calculate_region;
use crate::error::AppError;
use crate::geo;
use crate::models::location::{LocationUpdate, Region};
use crate::state::AppState;
use crate::store::LocationState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/location", get(get_location))
        .route("/location/user", put(set_user_location))
        .route("/location/destination", put(set_destination_location))
        .route("/region", get(get_region))
}

fn validate(update: &LocationUpdate) -> Result<(), AppError> {
    geo::validate(&update.coordinate()).map_err(AppError::BadRequest)
}

async fn get_location(State(state): State<Arc<AppState>>) -> Json<LocationState> {
    Json(state.location.read().await.clone())
}

async fn set_user_location(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LocationUpdate>,
) -> Result<Json<LocationState>, AppError> {
    validate(&payload)?;
    Ok(Json(update_location(&state, LocationSide::User, payload).await))
}

async fn set_destination_location(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LocationUpdate>,
) -> Result<Json<LocationState>, AppError> {
    validate(&payload)?;
    Ok(Json(
        update_location(&state, LocationSide::Destination, payload).await,
    ))
}

async fn get_region(State(state): State<Arc<AppState>>) -> Json<Region> {
    let location = state.location.read().await;
    Json(calculate_region(
        location.user().as_ref(),
        location.destination().as_ref(),
    ))
}
