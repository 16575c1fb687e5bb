use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::driver::{DriverId, MarkerData};
use crate::store::{StaleEstimate, StoreError};

/// Generation a fare estimate was started under. Results are only written
/// back if no newer estimate, driver list, or location change happened since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FareTicket(u64);

impl FareTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DriverState {
    drivers: Vec<MarkerData>,
    selected_driver: Option<DriverId>,
    fares_updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    generation: u64,
}

impl DriverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drivers(&self) -> &[MarkerData] {
        &self.drivers
    }

    pub fn selected_driver(&self) -> Option<DriverId> {
        self.selected_driver
    }

    pub fn fares_updated_at(&self) -> Option<DateTime<Utc>> {
        self.fares_updated_at
    }

    pub fn set_drivers(&mut self, drivers: Vec<MarkerData>) {
        if let Some(selected) = self.selected_driver {
            if !drivers.iter().any(|marker| marker.id() == selected) {
                self.selected_driver = None;
            }
        }
        self.drivers = drivers;
        self.fares_updated_at = None;
        self.generation += 1;
    }

    pub fn select_driver(&mut self, id: DriverId) -> Result<(), StoreError> {
        if !self.drivers.iter().any(|marker| marker.id() == id) {
            return Err(StoreError::UnknownDriver(id));
        }
        self.selected_driver = Some(id);
        Ok(())
    }

    pub fn clear_selected_driver(&mut self) {
        self.selected_driver = None;
    }

    pub fn begin_fare_estimate(&mut self) -> FareTicket {
        self.generation += 1;
        FareTicket(self.generation)
    }

    /// Outstanding estimates become stale and quotes for the previous trip
    /// are dropped; positions and selection stay.
    pub fn invalidate_fares(&mut self) {
        for marker in &mut self.drivers {
            marker.time = None;
            marker.price = None;
        }
        self.fares_updated_at = None;
        self.generation += 1;
    }

    /// On a stale ticket the state is left exactly as it was.
    pub fn apply_fares(
        &mut self,
        ticket: FareTicket,
        markers: Vec<MarkerData>,
    ) -> Result<(), StaleEstimate> {
        if ticket.0 != self.generation {
            return Err(StaleEstimate {
                ticket: ticket.0,
                current: self.generation,
            });
        }
        self.drivers = markers;
        self.fares_updated_at = Some(Utc::now());
        Ok(())
    }
}
