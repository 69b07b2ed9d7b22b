//! Builds a weather dataset for a location
//!
//! Resolves the grid cell and timezone, fetches the raw forecast and hands both
//! to the assembler. Each collaborator call is bounded by a budget that must
//! cover the source's own retries; the assembler only runs once both have
//! succeeded.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::api::ForecastSource;
use crate::models::{Location, WeatherDataset};
use crate::weather::assemble;
use crate::{Result, WeatherBuilderError};

pub struct WeatherBuilder<S> {
    source: S,
    timeout: Duration,
}

impl<S: ForecastSource> WeatherBuilder<S> {
    pub fn new(source: S, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Build the dataset for `location` as of the current time
    pub async fn build(&self, location: &Location) -> Result<WeatherDataset> {
        self.build_at(location, Utc::now()).await
    }

    /// Build the dataset for `location`, taking `reference` as "now"
    #[instrument(skip(self, location), fields(location = %location.name))]
    pub async fn build_at(
        &self,
        location: &Location,
        reference: DateTime<Utc>,
    ) -> Result<WeatherDataset> {
        location.validate()?;
        let start_time = Instant::now();

        let grid = self
            .bounded(self.source.resolve_grid(location))
            .await?;
        let payload = self.bounded(self.source.fetch_forecast(&grid)).await?;

        let dataset = assemble(&payload, &grid.time_zone, reference).inspect_err(|e| {
            warn!("Could not build dataset for {}: {}", location.name, e);
        })?;

        info!(
            "Built {} hourly points for {} ({}) in {:.3}s",
            dataset.number_of_data_points,
            location.name,
            dataset.time_zone,
            start_time.elapsed().as_secs_f64()
        );
        Ok(dataset)
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| WeatherBuilderError::Timeout {
                seconds: self.timeout.as_secs(),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastElement, ForecastPayload, GridPoint, Quantity, ValidTimeInterval};
    use chrono::TimeZone;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        time_zone: String,
        payload: ForecastPayload,
        delay: Duration,
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(payload: ForecastPayload) -> Self {
            Self {
                time_zone: "America/New_York".to_string(),
                payload,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl ForecastSource for FakeSource {
        async fn resolve_grid(&self, location: &Location) -> Result<GridPoint> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(location.format_coordinates());
            Ok(GridPoint {
                grid_id: "BOX".to_string(),
                grid_x: 82,
                grid_y: 42,
                time_zone: self.time_zone.clone(),
            })
        }

        async fn fetch_forecast(&self, _grid: &GridPoint) -> Result<ForecastPayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(self.payload.clone())
        }
    }

    // 12:00 EDT on 2024-05-10
    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 16, 0, 0).unwrap()
    }

    fn payload() -> ForecastPayload {
        // 00:00 EDT on 2024-05-10
        let start = Utc.with_ymd_and_hms(2024, 5, 10, 4, 0, 0).unwrap();
        let mut payload = ForecastPayload::new();
        for quantity in Quantity::ALL {
            payload.insert(
                quantity,
                ForecastElement::new("wmoUnit:degC").with_value("0", ValidTimeInterval::new(start, "PT3H")),
            );
        }
        payload
    }

    fn onset() -> Location {
        Location::new("Onset", 41.75, -70.644).with_title("Forecast for Onset, MA")
    }

    #[tokio::test]
    async fn test_build_aligns_to_grid_time_zone() {
        let builder = WeatherBuilder::new(FakeSource::new(payload()), Duration::from_secs(5));
        let dataset = builder.build_at(&onset(), reference()).await.unwrap();

        assert_eq!(dataset.time_zone, "America/New_York");
        assert_eq!(dataset.start_time, "2024-05-10T00:00:00");
        assert_eq!(dataset.data_points.len(), 121);
        assert_eq!(dataset.data_points[0].temperature, 32.0);
        assert_eq!(dataset.data_points[2].dewpoint, 32.0);
        assert_eq!(dataset.data_points[3].temperature, 0.0);
    }

    #[tokio::test]
    async fn test_grid_lookup_uses_rounded_coordinates() {
        let builder = WeatherBuilder::new(FakeSource::new(payload()), Duration::from_secs(5));
        let location = Location::new("Onset", 41.747_612, -70.667_649);

        builder.build_at(&location, reference()).await.unwrap();
        assert_eq!(*builder.source.requested.lock().unwrap(), vec!["41.7476,-70.6676"]);
    }

    #[tokio::test]
    async fn test_invalid_coordinates_skip_the_source() {
        let builder = WeatherBuilder::new(FakeSource::new(payload()), Duration::from_secs(5));
        let location = Location::new("Nowhere", 95.0, 0.0);

        let result = builder.build_at(&location, reference()).await;
        assert!(matches!(result, Err(WeatherBuilderError::Validation { .. })));
        assert_eq!(builder.source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_quantity_returns_no_dataset() {
        let mut payload = payload();
        payload.elements.remove(&Quantity::WindSpeed);
        let builder = WeatherBuilder::new(FakeSource::new(payload), Duration::from_secs(5));

        let result = builder.build_at(&onset(), reference()).await;
        assert!(matches!(result, Err(WeatherBuilderError::MissingQuantity { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let mut source = FakeSource::new(payload());
        source.delay = Duration::from_secs(60);
        let builder = WeatherBuilder::new(source, Duration::from_secs(20));

        let result = builder.build_at(&onset(), reference()).await;
        assert!(matches!(result, Err(WeatherBuilderError::Timeout { seconds: 20 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_budget_leaves_room_for_retries() {
        let mut config = crate::WeatherBuilderConfig::default();
        config.nws.timeout_seconds = 20;
        config.nws.max_retries = 3;

        // Two attempts timing out plus a backoff, still inside the budget
        let mut source = FakeSource::new(payload());
        source.delay = Duration::from_secs(50);
        let builder = WeatherBuilder::new(source, config.nws.call_budget());

        assert!(builder.build_at(&onset(), reference()).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_grid_time_zone() {
        let mut source = FakeSource::new(payload());
        source.time_zone = "Nowhere/Special".to_string();
        let builder = WeatherBuilder::new(source, Duration::from_secs(5));

        let result = builder.build_at(&onset(), reference()).await;
        assert!(matches!(result, Err(WeatherBuilderError::Validation { .. })));
    }
}
