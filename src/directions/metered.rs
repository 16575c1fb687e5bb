use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use prometheus::IntCounterVec;

use super::{DirectionsError, DirectionsService};
use crate::models::location::Coordinate;

pub struct MeteredDirections {
    inner: Arc<dyn DirectionsService>,
    requests: IntCounterVec,
}

impl MeteredDirections {
    pub fn new(inner: Arc<dyn DirectionsService>, requests: IntCounterVec) -> Self {
        Self { inner, requests }
    }
}

impl DirectionsService for MeteredDirections {
    fn leg_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> BoxFuture<'_, Result<u64, DirectionsError>> {
        async move {
            let result = self.inner.leg_duration(origin, destination).await;
            let outcome = if result.is_ok() { "success" } else { "error" };
            self.requests.with_label_values(&[outcome]).inc();
            result
        }
        .boxed()
    }
}
