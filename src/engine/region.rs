use crate::geo::coordinate_is_set;
use crate::models::location::{Coordinate, Region};

pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 37.78825,
    longitude: -122.4324,
};

pub const CLOSE_ZOOM_DELTA: f64 = 0.01;

const REGION_PADDING: f64 = 1.3;

/// Components equal to `0.0` count as unset (see [`crate::geo::is_set`]).
pub fn calculate_region(user: Option<&Coordinate>, destination: Option<&Coordinate>) -> Region {
    let user = match user {
        Some(user) if coordinate_is_set(Some(user)) => user,
        _ => return close_region(&DEFAULT_CENTER),
    };

    let destination = match destination {
        Some(destination) if coordinate_is_set(Some(destination)) => destination,
        _ => return close_region(user),
    };

    let min_lat = user.latitude.min(destination.latitude);
    let max_lat = user.latitude.max(destination.latitude);
    let min_lng = user.longitude.min(destination.longitude);
    let max_lng = user.longitude.max(destination.longitude);

    Region {
        latitude: (user.latitude + destination.latitude) / 2.0,
        longitude: (user.longitude + destination.longitude) / 2.0,
        latitude_delta: (max_lat - min_lat) * REGION_PADDING,
        longitude_delta: (max_lng - min_lng) * REGION_PADDING,
    }
}

fn close_region(center: &Coordinate) -> Region {
    Region {
        latitude: center.latitude,
        longitude: center.longitude,
        latitude_delta: CLOSE_ZOOM_DELTA,
        longitude_delta: CLOSE_ZOOM_DELTA,
    }
}
