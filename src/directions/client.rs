use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Url};
use tracing::debug;

use super::error::DirectionsError;
use super::response::parse_leg_duration;
use super::DirectionsService;
use crate::geo::to_query_param;
use crate::models::location::Coordinate;

#[derive(Debug, Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GoogleDirectionsClient {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Result<Self, DirectionsError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| DirectionsError::InvalidUrl(format!("{endpoint}: {err}")))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    fn leg_url(&self, origin: &Coordinate, destination: &Coordinate) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origin", &to_query_param(origin))
            .append_pair("destination", &to_query_param(destination))
            .append_pair("key", &self.api_key);
        url
    }

    async fn fetch_leg(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<u64, DirectionsError> {
        let url = self.leg_url(&origin, &destination);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectionsError::Status { status });
        }

        let body = response.bytes().await?;
        let seconds = parse_leg_duration(&body)?;
        debug!(
            origin = %to_query_param(&origin),
            destination = %to_query_param(&destination),
            seconds,
            "directions leg resolved"
        );
        Ok(seconds)
    }
}

impl DirectionsService for GoogleDirectionsClient {
    fn leg_duration(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> BoxFuture<'_, Result<u64, DirectionsError>> {
        self.fetch_leg(origin, destination).boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::GoogleDirectionsClient;
    use crate::directions::DirectionsError;
    use crate::models::location::Coordinate;

    #[test]
    fn leg_url_carries_origin_destination_and_key() {
        let client = GoogleDirectionsClient::new(
            "https://maps.example.com/maps/api/directions/json",
            "secret",
            Duration::from_secs(1),
        )
        .unwrap();

        let url = client.leg_url(
            &Coordinate::new(52.52, 13.405),
            &Coordinate::new(52.5163, 13.3777),
        );
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.path(), "/maps/api/directions/json");
        assert_eq!(
            pairs,
            vec![
                ("origin".to_string(), "52.52,13.405".to_string()),
                ("destination".to_string(), "52.5163,13.3777".to_string()),
                ("key".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let err = GoogleDirectionsClient::new("not a url", "k", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, DirectionsError::InvalidUrl(_)));
    }
}
