use serde::Deserialize;

use super::error::DirectionsError;

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
pub struct Leg {
    pub duration: Option<Duration>,
}

#[derive(Debug, Deserialize)]
pub struct Duration {
    pub value: u64,
}

// Only routes[0].legs[0].duration.value is read.
pub fn parse_leg_duration(body: &[u8]) -> Result<u64, DirectionsError> {
    let response: DirectionsResponse = serde_json::from_slice(body)
        .map_err(|err| DirectionsError::MalformedResponse(err.to_string()))?;

    let route = response
        .routes
        .first()
        .ok_or_else(|| DirectionsError::MalformedResponse("no routes".to_string()))?;
    let leg = route
        .legs
        .first()
        .ok_or_else(|| DirectionsError::MalformedResponse("route has no legs".to_string()))?;
    let duration = leg
        .duration
        .as_ref()
        .ok_or_else(|| DirectionsError::MalformedResponse("leg has no duration".to_string()))?;

    Ok(duration.value)
}
