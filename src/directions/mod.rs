mod client;
mod error;
mod metered;
mod response;

pub use client::GoogleDirectionsClient;
pub use error::DirectionsError;
pub use metered::MeteredDirections;
pub use response::{parse_leg_duration, DirectionsResponse};

use futures::future::BoxFuture;

use crate::models::location::Coordinate;

/// Anything that can tell how long driving from `origin` to `destination`
/// takes. Durations are whole seconds.
pub trait DirectionsService: Send + Sync {
    fn leg_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> BoxFuture<'_, Result<u64, DirectionsError>>;
}
