//! # Physical layer monitor configuration library.
//!
//! This is the library code for reading and validating the
//! configuration used by the monitor and its demo binary. No matter
//! which data source you use, ultimately it is loaded as an instance
//! of the [`Config`] struct, which is composed of more specialized
//! structs such as [`MonitorConfig`] and [`DemoConfig`]. This is the
//! instance you use in your Rust code to interact with the loaded
//! configuration.
#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(missing_docs)]

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod loaders;

/// The entire configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Monitor-specific configuration (the retry interval for failed opens).
    #[serde(default = "Config::default_monitor")]
    pub monitor: MonitorConfig,
    /// Configuration for the demo binary's physical layer.
    #[serde(default = "Config::default_demo")]
    pub demo: DemoConfig,
}

/// Monitor-specific configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// How long to wait, after a failed open attempt, before retrying.
    /// Non-negative by construction (`Duration` cannot be negative).
    #[serde(
        rename = "retry_interval_seconds",
        default = "MonitorConfig::default_retry_interval",
        with = "duration_seconds"
    )]
    pub retry_interval: Duration,
}

/// Configuration for the demo binary's TCP physical layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Address to listen on for inbound connections, when acting as a server.
    #[serde(default = "DemoConfig::default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Address to connect to, when acting as a client.
    #[serde(default = "DemoConfig::default_connect_addr")]
    pub connect_addr: SocketAddr,
}

impl Config {
    fn default_monitor() -> MonitorConfig {
        MonitorConfig::default()
    }

    fn default_demo() -> DemoConfig {
        DemoConfig::default()
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            monitor: Self::default_monitor(),
            demo: Self::default_demo(),
        }
    }
}

impl MonitorConfig {
    fn default_retry_interval() -> Duration {
        Duration::from_millis(3_000)
    }
}

impl Default for MonitorConfig {
    fn default() -> MonitorConfig {
        MonitorConfig {
            retry_interval: Self::default_retry_interval(),
        }
    }
}

impl DemoConfig {
    fn default_listen_addr() -> SocketAddr {
        "127.0.0.1:4040".parse().unwrap()
    }

    fn default_connect_addr() -> SocketAddr {
        "127.0.0.1:4040".parse().unwrap()
    }
}

impl Default for DemoConfig {
    fn default() -> DemoConfig {
        DemoConfig {
            listen_addr: Self::default_listen_addr(),
            connect_addr: Self::default_connect_addr(),
        }
    }
}

/// `serde` helper for (de)serializing a [`Duration`] as a plain number of seconds.
mod duration_seconds {
    use super::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
