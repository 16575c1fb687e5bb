use crate::models::location::Coordinate;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Zero and NaN components count as unset, so a point on the equator or the
/// prime meridian reads as "no location". Callers rely on this convention.
pub fn is_set(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

pub fn coordinate_is_set(coordinate: Option<&Coordinate>) -> bool {
    coordinate.is_some_and(|c| is_set(c.latitude) && is_set(c.longitude))
}

pub fn validate(coordinate: &Coordinate) -> Result<(), String> {
    if !coordinate.latitude.is_finite() || coordinate.latitude.abs() > MAX_LATITUDE {
        return Err(format!(
            "latitude {} outside [-90, 90]",
            coordinate.latitude
        ));
    }

    if !coordinate.longitude.is_finite() || coordinate.longitude.abs() > MAX_LONGITUDE {
        return Err(format!(
            "longitude {} outside [-180, 180]",
            coordinate.longitude
        ));
    }

    Ok(())
}

pub fn to_query_param(coordinate: &Coordinate) -> String {
    format!("{},{}", coordinate.latitude, coordinate.longitude)
}
