use serde::{Deserialize, Serialize};

use crate::models::location::Coordinate;

pub type DriverId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: String,
    pub car_image_url: String,
    pub car_seats: u32,
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerData {
    #[serde(flatten)]
    pub driver: Driver,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl MarkerData {
    pub fn id(&self) -> DriverId {
        self.driver.id
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn with_quote(&self, quote: &FareQuote) -> Self {
        Self {
            time: Some(quote.time_minutes),
            price: Some(quote.price.clone()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    pub time_minutes: f64,
    pub price: String,
}
