//! Load the configuration from a file or a `String` written in
//! [Toml format](https://en.wikipedia.org/wiki/TOML).

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::Config;

/// `toml::de::Error`, but loading that configuration from a file
/// might also fail with a `std::io::Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// There was an error when trying to read the configuration file.
    #[error("Error reading config file: {0}")]
    Io(#[from] io::Error),
    /// There was an error when trying to parse the Toml contents.
    #[error("Error parsing config file: {0}")]
    Parse(#[from] ::toml::de::Error),
}

/// Load configuration from a file written in Toml format.
pub fn from_file<S: AsRef<Path>>(file: S) -> Result<Config, Error> {
    let path = file.as_ref();
    tracing::debug!("Loading config from `{}`", path.to_string_lossy());

    let contents = std::fs::read_to_string(path)?;
    Ok(from_str(&contents)?)
}

/// Load configuration from a string written in Toml format.
pub fn from_str(contents: &str) -> Result<Config, ::toml::de::Error> {
    ::toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_string_gives_defaults() {
        let config = from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_table_overrides_only_named_fields() {
        let config = from_str("[monitor]\nretry_interval_seconds = 7\n").unwrap();
        assert_eq!(config.monitor.retry_interval, Duration::from_secs(7));
        assert_eq!(config.demo, Config::default().demo);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = from_file("/does/not/exist/plm.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
