use futures::future::{join_all, try_join_all};
use thiserror::Error;
use tracing::warn;

use crate::directions::{DirectionsError, DirectionsService};
use crate::geo::coordinate_is_set;
use crate::models::driver::{DriverId, FareQuote, MarkerData};
use crate::models::location::Coordinate;

pub const PRICE_PER_MINUTE: f64 = 0.5;

#[derive(Debug, Error)]
#[error("fare lookup for driver {driver_id} failed: {source}")]
pub struct FareError {
    pub driver_id: DriverId,
    #[source]
    pub source: DirectionsError,
}

#[derive(Debug)]
pub struct IsolatedFares {
    pub markers: Vec<MarkerData>,
    pub failures: Vec<FareError>,
}

impl IsolatedFares {
    pub fn failed_driver_ids(&self) -> Vec<DriverId> {
        self.failures.iter().map(|failure| failure.driver_id).collect()
    }
}

pub fn quote_from_durations(to_user_secs: u64, to_destination_secs: u64) -> FareQuote {
    let time_minutes = (to_user_secs + to_destination_secs) as f64 / 60.0;
    FareQuote {
        time_minutes,
        price: format_price(time_minutes * PRICE_PER_MINUTE),
    }
}

/// Two decimals with ties rounded up, so 0.125 prints as "0.13".
fn format_price(amount: f64) -> String {
    format!("{:.2}", (amount * 100.0).round() / 100.0)
}

pub async fn quote_marker<D>(
    directions: &D,
    marker: &MarkerData,
    user: Coordinate,
    destination: Coordinate,
) -> Result<FareQuote, FareError>
where
    D: DirectionsService + ?Sized,
{
    let lookup = async {
        let to_user = directions.leg_duration(marker.coordinate(), user).await?;
        let to_destination = directions.leg_duration(user, destination).await?;
        Ok::<_, DirectionsError>(quote_from_durations(to_user, to_destination))
    };

    lookup.await.map_err(|source| {
        warn!(driver_id = marker.id(), error = %source, "directions lookup failed");
        FareError {
            driver_id: marker.id(),
            source,
        }
    })
}

/// `Ok(None)` without any lookup when the user or destination is unset. One
/// failed marker fails the whole batch.
pub async fn estimate_fares<D>(
    directions: &D,
    markers: &[MarkerData],
    user: Option<&Coordinate>,
    destination: Option<&Coordinate>,
) -> Result<Option<Vec<MarkerData>>, FareError>
where
    D: DirectionsService + ?Sized,
{
    let Some((user, destination)) = trip_endpoints(user, destination) else {
        return Ok(None);
    };

    let priced = try_join_all(markers.iter().map(|marker| async move {
        quote_marker(directions, marker, user, destination)
            .await
            .map(|quote| marker.with_quote(&quote))
    }))
    .await?;

    Ok(Some(priced))
}

pub async fn estimate_fares_isolated<D>(
    directions: &D,
    markers: &[MarkerData],
    user: Option<&Coordinate>,
    destination: Option<&Coordinate>,
) -> Option<IsolatedFares>
where
    D: DirectionsService + ?Sized,
{
    let (user, destination) = trip_endpoints(user, destination)?;

    let results = join_all(
        markers
            .iter()
            .map(|marker| quote_marker(directions, marker, user, destination)),
    )
    .await;

    let mut outcome = IsolatedFares {
        markers: Vec::with_capacity(markers.len()),
        failures: Vec::new(),
    };
    for (marker, result) in markers.iter().zip(results) {
        match result {
            Ok(quote) => outcome.markers.push(marker.with_quote(&quote)),
            Err(err) => {
                outcome.markers.push(MarkerData {
                    time: None,
                    price: None,
                    ..marker.clone()
                });
                outcome.failures.push(err);
            }
        }
    }

    Some(outcome)
}

fn trip_endpoints(
    user: Option<&Coordinate>,
    destination: Option<&Coordinate>,
) -> Option<(Coordinate, Coordinate)> {
    if !coordinate_is_set(user) || !coordinate_is_set(destination) {
        return None;
    }
    Some((*user?, *destination?))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;
    use futures::FutureExt;

    use super::{estimate_fares, estimate_fares_isolated, quote_from_durations};
    use crate::directions::{DirectionsError, DirectionsService};
    use crate::models::driver::{Driver, MarkerData};
    use crate::models::location::Coordinate;

    const USER: Coordinate = Coordinate {
        latitude: 52.52,
        longitude: 13.405,
    };
    const DESTINATION: Coordinate = Coordinate {
        latitude: 52.5163,
        longitude: 13.3777,
    };

    // 600s user to destination, `to_user_secs` otherwise.
    struct FakeDirections {
        to_user_secs: u64,
        failing_origins: HashSet<u64>,
        calls: AtomicUsize,
    }

    impl FakeDirections {
        fn new(to_user_secs: u64) -> Self {
            Self {
                to_user_secs,
                failing_origins: HashSet::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_from(mut self, origin: &Coordinate) -> Self {
            self.failing_origins.insert(origin.latitude.to_bits());
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl DirectionsService for FakeDirections {
        fn leg_duration(
            &self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> BoxFuture<'_, Result<u64, DirectionsError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = if self.failing_origins.contains(&origin.latitude.to_bits()) {
                Err(DirectionsError::MalformedResponse("no routes".to_string()))
            } else if origin == USER && destination == DESTINATION {
                Ok(600)
            } else {
                Ok(self.to_user_secs)
            };
            async move { result }.boxed()
        }
    }

    fn marker(id: i64, latitude: f64, longitude: f64) -> MarkerData {
        MarkerData {
            driver: Driver {
                id,
                first_name: "Test".to_string(),
                last_name: format!("Driver{id}"),
                profile_image_url: String::new(),
                car_image_url: String::new(),
                car_seats: 4,
                rating: "4.50".to_string(),
            },
            latitude,
            longitude,
            title: format!("Test Driver{id}"),
            time: None,
            price: None,
        }
    }

    #[test]
    fn price_is_half_a_unit_per_minute() {
        let quote = quote_from_durations(300, 600);
        assert_eq!(quote.time_minutes, 15.0);
        assert_eq!(quote.price, "7.50");

        let quote = quote_from_durations(61, 0);
        assert!((quote.time_minutes - 61.0 / 60.0).abs() < 1e-12);
        assert_eq!(quote.price, "0.51");
    }

    #[test]
    fn price_ties_round_up() {
        assert_eq!(quote_from_durations(15, 0).price, "0.13");
        assert_eq!(quote_from_durations(75, 0).price, "0.63");
        assert_eq!(quote_from_durations(300, 15).price, "2.63");
        assert_eq!(quote_from_durations(135, 0).price, "1.13");
    }

    #[tokio::test]
    async fn unset_coordinates_skip_without_lookups() {
        let directions = FakeDirections::new(300);
        let markers = vec![marker(1, 52.521, 13.404)];
        let on_equator = Coordinate::new(0.0, 13.4);

        assert!(estimate_fares(&directions, &markers, None, Some(&DESTINATION))
            .await
            .unwrap()
            .is_none());
        assert!(estimate_fares(&directions, &markers, Some(&USER), None)
            .await
            .unwrap()
            .is_none());
        assert!(estimate_fares(&directions, &markers, Some(&on_equator), Some(&DESTINATION))
            .await
            .unwrap()
            .is_none());
        assert!(estimate_fares_isolated(&directions, &markers, Some(&USER), None)
            .await
            .is_none());

        assert_eq!(directions.calls(), 0);
    }

    #[tokio::test]
    async fn prices_every_marker_in_order() {
        let directions = FakeDirections::new(300);
        let markers = vec![
            marker(3, 52.521, 13.404),
            marker(1, 52.519, 13.409),
            marker(2, 52.523, 13.401),
        ];

        let priced = estimate_fares(&directions, &markers, Some(&USER), Some(&DESTINATION))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(directions.calls(), 6);
        let ids: Vec<i64> = priced.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        for (out, original) in priced.iter().zip(&markers) {
            assert_eq!(out.time, Some(15.0));
            assert_eq!(out.price.as_deref(), Some("7.50"));
            assert_eq!(out.latitude, original.latitude);
            assert_eq!(out.title, original.title);
        }
    }

    #[tokio::test]
    async fn one_failing_marker_fails_the_batch() {
        let failing = marker(2, 52.523, 13.401);
        let directions = FakeDirections::new(300).failing_from(&failing.coordinate());
        let markers = vec![marker(1, 52.521, 13.404), failing];

        let err = estimate_fares(&directions, &markers, Some(&USER), Some(&DESTINATION))
            .await
            .unwrap_err();

        assert_eq!(err.driver_id, 2);
        assert!(matches!(err.source, DirectionsError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn isolated_estimate_keeps_successful_quotes() {
        let failing = marker(2, 52.523, 13.401);
        let directions = FakeDirections::new(120).failing_from(&failing.coordinate());
        let mut stale = failing.clone();
        stale.time = Some(3.0);
        stale.price = Some("1.50".to_string());
        let markers = vec![marker(1, 52.521, 13.404), stale, marker(3, 52.519, 13.409)];

        let outcome = estimate_fares_isolated(&directions, &markers, Some(&USER), Some(&DESTINATION))
            .await
            .unwrap();

        assert_eq!(outcome.failed_driver_ids(), vec![2]);
        assert_eq!(outcome.markers.len(), 3);
        assert_eq!(outcome.markers[0].time, Some(12.0));
        assert_eq!(outcome.markers[0].price.as_deref(), Some("6.00"));
        assert_eq!(outcome.markers[1].id(), 2);
        assert_eq!(outcome.markers[1].time, None);
        assert_eq!(outcome.markers[1].price, None);
        assert_eq!(outcome.markers[2].price.as_deref(), Some("6.00"));
    }

    #[tokio::test]
    async fn empty_marker_list_prices_nothing() {
        let directions = FakeDirections::new(300);
        let priced = estimate_fares(&directions, &[], Some(&USER), Some(&DESTINATION))
            .await
            .unwrap()
            .unwrap();
        assert!(priced.is_empty());
        assert_eq!(directions.calls(), 0);
    }
}
