use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::info;

use climatewatch::api::AppState;
use climatewatch::{ClimateWatchConfig, WeatherMap, logging, web};

fn config_path_from_args() -> Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    match (args.next().as_deref(), args.next()) {
        (None, _) => Ok(None),
        (Some("--config"), Some(path)) => Ok(Some(PathBuf::from(path))),
        (Some(other), _) => bail!("Usage: climatewatch [--config <path>] (got '{other}')"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClimateWatchConfig::load_from_path(config_path_from_args()?)?;
    logging::init(&config.logging)?;

    if config.weather.api_key.is_none() {
        info!("No weather API key configured; markers will use synthetic weather");
    }

    let state = Arc::new(AppState::new(WeatherMap::from_config(&config)?));

    let seeding = Arc::clone(&state);
    tokio::spawn(async move {
        seeding.map.seed_major_cities().await;
    });

    web::run(state, &config.server).await
}
