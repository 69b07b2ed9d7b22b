//! Integration tests for the weather builder

use std::process::Command;

use chrono::{DateTime, TimeZone, Utc};
use weather_builder::api::nws::parse_gridpoint;
use weather_builder::weather::assemble;
use weather_builder::{Quantity, WeatherBuilderError};

const GRIDPOINT_BOX: &str = include_str!("fixtures/gridpoint_box.json");

/// 10:00 EDT on 2024-05-10
fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 14, 0, 0).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Test a recorded gridpoint forecast normalizes into the expected hourly series
#[test]
fn test_gridpoint_fixture_builds_dataset() {
    let payload = parse_gridpoint(GRIDPOINT_BOX).unwrap();
    let dataset = assemble(&payload, "America/New_York", reference()).unwrap();

    assert_eq!(dataset.data_points.len(), 121);
    assert_eq!(dataset.time_zone, "America/New_York");
    assert_eq!(dataset.start_time, "2024-05-10T00:00:00");
    assert_eq!(dataset.first_hour, 4);

    let temperature = dataset.series(Quantity::Temperature);
    assert_close(temperature[0], 11.1 * 9.0 / 5.0 + 32.0);
    assert_close(temperature[1], 11.1 * 9.0 / 5.0 + 32.0);
    assert_close(temperature[2], 10.5 * 9.0 / 5.0 + 32.0);
    assert!(temperature[3..].iter().all(|t| (*t - 53.6).abs() < 1e-9));
}

/// Test a stream that starts in the yesterday band only leaks its tail into the result
#[test]
fn test_stream_starting_yesterday() {
    let payload = parse_gridpoint(GRIDPOINT_BOX).unwrap();
    let dataset = assemble(&payload, "America/New_York", reference()).unwrap();

    let dewpoint = dataset.series(Quantity::Dewpoint);
    assert_close(dewpoint[0], 8.3 * 9.0 / 5.0 + 32.0);
    assert_close(dewpoint[1], 8.3 * 9.0 / 5.0 + 32.0);
    assert_close(dewpoint[2], 9.0 * 9.0 / 5.0 + 32.0);
    assert!(dewpoint[3..].iter().all(|d| *d == 0.0));
}

/// Test streams that start after local midnight leave earlier hours at zero
#[test]
fn test_streams_align_independently() {
    let payload = parse_gridpoint(GRIDPOINT_BOX).unwrap();
    let dataset = assemble(&payload, "America/New_York", reference()).unwrap();

    let sky = dataset.series(Quantity::SkyCover);
    assert_eq!(sky[0], 0.0);
    assert!(sky[1..5].iter().all(|s| *s == 93.0));
    assert_eq!(sky[5], 0.0);

    let pop = dataset.series(Quantity::ProbabilityOfPrecipitation);
    assert!(pop[..6].iter().all(|p| *p == 20.0));
    assert!(pop[6..32].iter().all(|p| *p == 40.0));
    assert_eq!(pop[32], 0.0);

    let wind = dataset.series(Quantity::WindSpeed);
    assert_close(wind[0], 14.816 / 1.60934);
    assert_eq!(wind[3], 0.0);

    let qpf = dataset.series(Quantity::QuantitativePrecipitation);
    assert_close(qpf[5], 2.54 * 0.0393701);
    assert_eq!(qpf[6], 0.0);
}

/// Test a payload without wind speed produces no dataset at all
#[test]
fn test_missing_wind_speed_fails() {
    let mut payload = parse_gridpoint(GRIDPOINT_BOX).unwrap();
    payload.elements.remove(&Quantity::WindSpeed);

    let result = assemble(&payload, "America/New_York", reference());
    assert!(matches!(
        result,
        Err(WeatherBuilderError::MissingQuantity {
            quantity: Quantity::WindSpeed
        })
    ));
}

/// Test building twice from the same payload and reference yields the same dataset
#[test]
fn test_rebuild_is_identical() {
    let payload = parse_gridpoint(GRIDPOINT_BOX).unwrap();
    let first = assemble(&payload, "America/New_York", reference()).unwrap();
    let second = assemble(&payload, "America/New_York", reference()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

/// Test the binary refuses to run without a contact string
#[test]
fn test_cli_requires_user_agent() {
    let output = Command::new(env!("CARGO_BIN_EXE_weather-builder"))
        .arg("does-not-exist.toml")
        .env_remove("WEATHER_BUILDER_NWS__USER_AGENT")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("user_agent"), "got: {stderr}");
}

/// Test the binary prints an empty list when no locations are configured
#[test]
fn test_cli_without_locations() {
    let output = Command::new(env!("CARGO_BIN_EXE_weather-builder"))
        .arg("does-not-exist.toml")
        .env("WEATHER_BUILDER_NWS__USER_AGENT", "forecasts@example.com")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "[]");
}
