use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::backend::BackendClient;
use crate::config::{Config, FailurePolicy};
use crate::directions::{DirectionsService, GoogleDirectionsClient, MeteredDirections};
use crate::error::AppError;
use crate::observability::metrics::Metrics;
use crate::store::{DriverState, LocationState};

pub struct AppState {
    pub location: RwLock<LocationState>,
    pub drivers: RwLock<DriverState>,
    pub directions: Arc<dyn DirectionsService>,
    pub backend: BackendClient,
    pub failure_policy: FailurePolicy,
    pub driver_events_tx: broadcast::Sender<DriverState>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(
        directions: Arc<dyn DirectionsService>,
        backend: BackendClient,
        failure_policy: FailurePolicy,
        event_buffer_size: usize,
    ) -> Self {
        let metrics = Metrics::new();
        let directions = Arc::new(MeteredDirections::new(
            directions,
            metrics.directions_requests_total.clone(),
        ));
        let (driver_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            location: RwLock::new(LocationState::new()),
            drivers: RwLock::new(DriverState::new()),
            directions,
            backend,
            failure_policy,
            driver_events_tx,
            metrics,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let directions = GoogleDirectionsClient::new(
            &config.directions_endpoint,
            &config.directions_api_key,
            config.directions_timeout,
        )
        .map_err(|err| AppError::Internal(format!("directions client: {err}")))?;
        let backend = BackendClient::new(&config.backend_url)
            .map_err(|err| AppError::Internal(format!("backend client: {err}")))?;

        Ok(Self::new(
            Arc::new(directions),
            backend,
            config.failure_policy,
            config.event_buffer_size,
        ))
    }

    pub fn publish_drivers(&self, snapshot: &DriverState) {
        self.metrics.drivers_on_map.set(snapshot.drivers().len() as i64);
        let _ = self.driver_events_tx.send(snapshot.clone());
    }
}
