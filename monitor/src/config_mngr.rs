//! Config manager: process-wide, swappable access to the loaded
//! [`plm_config::Config`], the same shape as `session-core-v2`'s
//! `lazy_static! { static ref MASTER_TABLE: ... }` singleton, except
//! initialized explicitly at startup rather than on first access,
//! since the config must reflect whatever the CLI was given.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use plm_config::loaders::toml;
use plm_config::Config;

static CONFIG: OnceLock<RwLock<Arc<Config>>> = OnceLock::new();

/// Start the configuration manager with an initial configuration.
///
/// Calling this more than once has no effect after the first call;
/// use [`load_from_file`] to replace the configuration afterwards.
pub fn start(config: Arc<Config>) {
    if CONFIG.set(RwLock::new(config)).is_err() {
        tracing::warn!("config manager already started");
    }
}

/// Start the configuration manager with the default configuration.
pub fn start_default() {
    start(Arc::new(Config::default()));
}

/// Get a reference to the current configuration.
///
/// Falls back to the default configuration if [`start`] was never
/// called.
pub fn get() -> Arc<Config> {
    match CONFIG.get() {
        Some(lock) => Arc::clone(&lock.read()),
        None => Arc::new(Config::default()),
    }
}

/// Replace the configuration with the one loaded from the given file.
pub fn load_from_file(filename: PathBuf) -> Result<(), toml::Error> {
    let new_config = toml::from_file(&filename).map_err(|err| {
        tracing::error!(
            "failed to load new configuration from {:?}: {}",
            filename, err
        );
        err
    })?;

    let new_config = Arc::new(new_config);
    match CONFIG.get() {
        Some(lock) => *lock.write() = new_config,
        None => start(new_config),
    }

    tracing::info!("loaded new configuration from {:?}", filename);
    Ok(())
}
