use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use futures::future::join_all;
use tracing::{error, info};
use weather_builder::models::LocationDataset;
use weather_builder::{NwsClient, WeatherBuilder, WeatherBuilderConfig, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = WeatherBuilderConfig::load_from_path(config_path)?;
    telemetry::init(&config.logging)?;

    let client = NwsClient::new(&config.nws).context("Failed to create NWS client")?;
    let builder = WeatherBuilder::new(client, config.nws.call_budget());

    info!("Building datasets for {} location(s)", config.locations.len());

    let results = join_all(config.locations.iter().map(|location| {
        let builder = &builder;
        async move { (location, builder.build(location).await) }
    }))
    .await;

    let mut datasets = Vec::new();
    let mut failures = 0;
    for (location, result) in results {
        match result {
            Ok(dataset) => datasets.push(LocationDataset {
                location: location.clone(),
                dataset,
            }),
            Err(e) => {
                error!("{}: {}", location.name, e);
                eprintln!("{}: {}", location.name, e.user_message());
                failures += 1;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&datasets)?);

    info!(
        "Done: {} of {} location(s) built",
        datasets.len(),
        config.locations.len()
    );
    if failures > 0 {
        bail!("{failures} location(s) failed");
    }
    Ok(())
}
