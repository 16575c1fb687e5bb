use rand::Rng;

use crate::models::driver::{Driver, MarkerData};
use crate::models::location::Coordinate;

pub const MARKER_SPREAD_DEGREES: f64 = 0.01;

pub fn generate_markers<R>(drivers: &[Driver], user: &Coordinate, rng: &mut R) -> Vec<MarkerData>
where
    R: Rng + ?Sized,
{
    drivers
        .iter()
        .map(|driver| {
            let lat_offset = rng.gen_range(-0.5..0.5) * MARKER_SPREAD_DEGREES;
            let lng_offset = rng.gen_range(-0.5..0.5) * MARKER_SPREAD_DEGREES;

            MarkerData {
                driver: driver.clone(),
                latitude: user.latitude + lat_offset,
                longitude: user.longitude + lng_offset,
                title: format!("{} {}", driver.first_name, driver.last_name),
                time: None,
                price: None,
            }
        })
        .collect()
}
