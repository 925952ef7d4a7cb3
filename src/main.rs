use log::{error, info};
use modis_batch::batch::BatchRunner;
use modis_batch::config::Config;
use modis_batch::gdal_env;
use std::time::Instant;

const DEFAULT_CONFIG: &str = "./data/config/modis_config.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = Instant::now();
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    info!("Loading configuration from {}", config_path);

    let config = Config::from_file(&config_path).inspect_err(|e| error!("{}", e))?;
    gdal_env::init(config.gdal_options())?;

    let runner = BatchRunner::new(&config).inspect_err(|e| error!("{}", e))?;
    let summary = runner.run().inspect_err(|e| error!("{}", e))?;

    info!(
        "Extracted: {}, clipped: {}, aggregate: {}",
        summary.extracted.len(),
        summary.clipped.len(),
        summary
            .aggregate
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string())
    );
    info!("Finished in {:.2} s", start.elapsed().as_secs_f64());

    Ok(())
}
