use prometheus::{
    Encoder, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub directions_requests_total: IntCounterVec,
    pub fare_estimations_total: IntCounterVec,
    pub fare_estimation_latency_seconds: HistogramVec,
    pub drivers_on_map: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let directions_requests_total = IntCounterVec::new(
            Opts::new(
                "directions_requests_total",
                "Directions leg lookups by outcome",
            ),
            &["outcome"],
        )
        .expect("valid directions_requests_total metric");

        let fare_estimations_total = IntCounterVec::new(
            Opts::new("fare_estimations_total", "Fare estimations by outcome"),
            &["outcome"],
        )
        .expect("valid fare_estimations_total metric");

        let fare_estimation_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "fare_estimation_latency_seconds",
                "Wall time of a fare estimation in seconds",
            ),
            &["outcome"],
        )
        .expect("valid fare_estimation_latency_seconds metric");

        let drivers_on_map = IntGauge::new("drivers_on_map", "Drivers currently placed on the map")
            .expect("valid drivers_on_map metric");

        registry
            .register(Box::new(directions_requests_total.clone()))
            .expect("register directions_requests_total");
        registry
            .register(Box::new(fare_estimations_total.clone()))
            .expect("register fare_estimations_total");
        registry
            .register(Box::new(fare_estimation_latency_seconds.clone()))
            .expect("register fare_estimation_latency_seconds");
        registry
            .register(Box::new(drivers_on_map.clone()))
            .expect("register drivers_on_map");

        Self {
            registry,
            directions_requests_total,
            fare_estimations_total,
            fare_estimation_latency_seconds,
            drivers_on_map,
        }
    }

    pub fn record_estimation(&self, outcome: &str, elapsed_secs: f64) {
        self.fare_estimations_total
            .with_label_values(&[outcome])
            .inc();
        self.fare_estimation_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_secs);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
