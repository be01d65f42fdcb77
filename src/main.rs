use std::error::Error;
use std::path::Path;

use midi_binding::config::{Config, ConfigError};
use midi_binding::midi_controller::MidiController;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE_NAME: &str = "midi_binding.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let (config, missing) = match load_config(Path::new(CONFIG_FILE_NAME)) {
        Ok(loaded) => loaded,
        Err(err) => {
            init_logging(None);
            error!("Error while reading config file {}: {}", CONFIG_FILE_NAME, err);
            return Err(err.into());
        }
    };
    init_logging(config.log_filter.as_deref());

    if let Some(err) = missing {
        warn!("Config file {} not found ({}), writing defaults", CONFIG_FILE_NAME, err);
        if let Err(err) = Config::write_default_config_file(CONFIG_FILE_NAME) {
            error!("Could not write default config file: {}", err);
        }
    }

    let midi_controller = MidiController::new(&config.midi_devices)?;
    if midi_controller.device_count() == 0 {
        return Err("No midi devices configured".into());
    }
    info!("Connected to {} midi device[s].", midi_controller.device_count());

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    Ok(())
}

fn init_logging(config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config_filter.unwrap_or("info")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Reads the config file. A missing file yields the defaults along with the
/// not-found error; any other error is returned and the file is left alone.
fn load_config(path: &Path) -> Result<(Config, Option<ConfigError>), ConfigError> {
    match Config::read_from_config(path) {
        Ok(config) => Ok((config, None)),
        Err(err) if err.is_not_found() => Ok((Config::default(), Some(err))),
        Err(err) => Err(err),
    }
}
