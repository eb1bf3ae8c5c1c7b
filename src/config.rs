//! Runtime configuration shared by the library and the binary.

use clap::{Args, ValueEnum};
use std::time::Duration;

use crate::provider::Provider;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Geolocation service to query
    #[clap(long, value_enum, default_value_t = Provider::IpapiCo, global = true)]
    pub provider: Provider,

    /// Override the provider's base URL
    #[clap(long, env = "GEOLOCATE_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Total request timeout in seconds
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// TCP connect timeout in seconds
    #[clap(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS, global = true)]
    pub connect_timeout: u64,

    /// Minimum log level (overrides RUST_LOG)
    #[clap(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: Provider::default(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Base URL requests go to: the override if set, otherwise the provider default.
    pub fn base_url(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_override_wins() {
        let config = Config {
            endpoint: Some("http://127.0.0.1:9000".into()),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn falls_back_to_provider_base() {
        let config = Config {
            provider: Provider::IpApiCom,
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://ip-api.com");
        assert_eq!(Config::default().base_url(), "https://ipapi.co");
    }
}
