use log::{LevelFilter, SetLoggerError};

/// Installs env_logger. `RUST_LOG` is read first and `level` overrides it for
/// this crate; HTTP internals stay at info so `--log-level trace` stays readable.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("geolocate", level);
    builder.format_timestamp_millis();
    builder.try_init()
}
