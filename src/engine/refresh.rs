use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::FailurePolicy;
use crate::engine::fare::{estimate_fares, estimate_fares_isolated};
use crate::engine::markers::generate_markers;
use crate::error::AppError;
use crate::geo::coordinate_is_set;
use crate::models::driver::{Driver, DriverId, MarkerData};
use crate::models::location::LocationUpdate;
use crate::state::AppState;
use crate::store::{DriverState, LocationState, StaleEstimate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSide {
    User,
    Destination,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FareRun {
    Applied {
        drivers: Vec<MarkerData>,
    },
    Partial {
        drivers: Vec<MarkerData>,
        failed_driver_ids: Vec<DriverId>,
    },
    Skipped,
    Stale {
        generation: u64,
    },
}

impl FareRun {
    fn outcome(&self) -> &'static str {
        match self {
            FareRun::Applied { .. } => "applied",
            FareRun::Partial { .. } => "partial",
            FareRun::Skipped => "skipped",
            FareRun::Stale { .. } => "stale",
        }
    }
}

pub async fn update_location(
    state: &AppState,
    side: LocationSide,
    update: LocationUpdate,
) -> LocationState {
    let snapshot = {
        let mut location = state.location.write().await;
        match side {
            LocationSide::User => location.set_user_location(update),
            LocationSide::Destination => location.set_destination_location(update),
        }
        location.clone()
    };

    let drivers = {
        let mut store = state.drivers.write().await;
        store.invalidate_fares();
        store.clone()
    };
    state.publish_drivers(&drivers);
    info!(?side, "location updated");
    snapshot
}

pub async fn place_drivers(state: &AppState, drivers: Vec<Driver>) -> Result<DriverState, AppError> {
    let user = state.location.read().await.user();
    let user = match user {
        Some(user) if coordinate_is_set(Some(&user)) => user,
        _ => {
            return Err(AppError::BadRequest(
                "user location must be set before placing drivers".to_string(),
            ));
        }
    };

    let markers = generate_markers(&drivers, &user, &mut rand::thread_rng());

    let snapshot = {
        let mut store = state.drivers.write().await;
        store.set_drivers(markers);
        store.clone()
    };

    state.publish_drivers(&snapshot);
    info!(drivers = snapshot.drivers().len(), "drivers placed");
    Ok(snapshot)
}

pub async fn select_driver(state: &AppState, id: Option<DriverId>) -> Result<DriverState, AppError> {
    let snapshot = {
        let mut store = state.drivers.write().await;
        match id {
            Some(id) => store.select_driver(id)?,
            None => store.clear_selected_driver(),
        }
        store.clone()
    };

    state.publish_drivers(&snapshot);
    Ok(snapshot)
}

pub async fn refresh_fares(state: &AppState) -> Result<FareRun, AppError> {
    let estimate_id = Uuid::new_v4();
    let start = Instant::now();

    let result = run_estimate(state)
        .instrument(info_span!("fare_estimate", %estimate_id))
        .await;

    let elapsed = start.elapsed().as_secs_f64();
    match &result {
        Ok(run) => state.metrics.record_estimation(run.outcome(), elapsed),
        Err(err) => {
            state.metrics.record_estimation("failed", elapsed);
            error!(%estimate_id, error = %err, "fare estimate failed");
        }
    }
    result
}

async fn run_estimate(state: &AppState) -> Result<FareRun, AppError> {
    // Location is read under the drivers lock so a concurrent location change
    // always lands after the ticket and invalidates it.
    let (ticket, markers, user, destination) = {
        let mut store = state.drivers.write().await;
        let ticket = store.begin_fare_estimate();
        let location = state.location.read().await;
        (
            ticket,
            store.drivers().to_vec(),
            location.user(),
            location.destination(),
        )
    };

    let directions = state.directions.as_ref();
    let (priced, failed_driver_ids) = match state.failure_policy {
        FailurePolicy::FailBatch => {
            match estimate_fares(directions, &markers, user.as_ref(), destination.as_ref()).await? {
                Some(priced) => (priced, Vec::new()),
                None => return Ok(FareRun::Skipped),
            }
        }
        FailurePolicy::Isolate => {
            match estimate_fares_isolated(directions, &markers, user.as_ref(), destination.as_ref())
                .await
            {
                Some(outcome) => {
                    let failed = outcome.failed_driver_ids();
                    (outcome.markers, failed)
                }
                None => return Ok(FareRun::Skipped),
            }
        }
    };

    let applied = {
        let mut store = state.drivers.write().await;
        store
            .apply_fares(ticket, priced.clone())
            .map(|()| store.clone())
    };

    match applied {
        Ok(snapshot) => {
            state.publish_drivers(&snapshot);
            info!(
                generation = ticket.generation(),
                drivers = priced.len(),
                failed = failed_driver_ids.len(),
                "fares applied"
            );
            if failed_driver_ids.is_empty() {
                Ok(FareRun::Applied { drivers: priced })
            } else {
                Ok(FareRun::Partial {
                    drivers: priced,
                    failed_driver_ids,
                })
            }
        }
        Err(StaleEstimate { ticket, current }) => {
            info!(ticket, current, "discarding stale fare estimate");
            Ok(FareRun::Stale { generation: ticket })
        }
    }
}
