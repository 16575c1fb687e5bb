pub mod drivers;
pub mod location;

pub use drivers::{DriverState, FareTicket};
pub use location::LocationState;

use thiserror::Error;

use crate::models::driver::DriverId;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("driver {0} is not on the map")]
    UnknownDriver(DriverId),
}

#[derive(Debug, Error, PartialEq)]
#[error("fare estimate {ticket} is stale (current generation {current})")]
pub struct StaleEstimate {
    pub ticket: u64,
    pub current: u64,
}
