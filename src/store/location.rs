use serde::Serialize;

use crate::models::location::{Coordinate, LocationUpdate};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationState {
    user: Option<Coordinate>,
    user_address: Option<String>,
    destination: Option<Coordinate>,
    destination_address: Option<String>,
}

impl LocationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_location(&mut self, update: LocationUpdate) {
        self.user = Some(update.coordinate());
        self.user_address = Some(update.address);
    }

    pub fn set_destination_location(&mut self, update: LocationUpdate) {
        self.destination = Some(update.coordinate());
        self.destination_address = Some(update.address);
    }

    pub fn user(&self) -> Option<Coordinate> {
        self.user
    }

    pub fn user_address(&self) -> Option<&str> {
        self.user_address.as_deref()
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn destination_address(&self) -> Option<&str> {
        self.destination_address.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::LocationState;
    use crate::models::location::{Coordinate, LocationUpdate};

    fn update(latitude: f64, longitude: f64, address: &str) -> LocationUpdate {
        LocationUpdate {
            latitude,
            longitude,
            address: address.to_string(),
        }
    }

    #[test]
    fn starts_with_everything_unset() {
        let state = LocationState::new();
        assert_eq!(state.user(), None);
        assert_eq!(state.user_address(), None);
        assert_eq!(state.destination(), None);
        assert_eq!(state.destination_address(), None);
    }

    #[test]
    fn setters_replace_their_own_side_only() {
        let mut state = LocationState::new();
        state.set_user_location(update(52.52, 13.405, "Alexanderplatz"));
        state.set_destination_location(update(52.5163, 13.3777, "Brandenburger Tor"));
        state.set_user_location(update(52.5, 13.4, "Kreuzberg"));

        assert_eq!(state.user(), Some(Coordinate::new(52.5, 13.4)));
        assert_eq!(state.user_address(), Some("Kreuzberg"));
        assert_eq!(state.destination(), Some(Coordinate::new(52.5163, 13.3777)));
        assert_eq!(state.destination_address(), Some("Brandenburger Tor"));
    }
}
