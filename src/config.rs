use crate::errors::ConfigError;
use crate::press::PressTiming;
use crate::session::DEFAULT_TARGET;
use crate::storage::DEFAULT_DATA_PATH;
use std::{num::NonZeroU64, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOLD_IDLE_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub target: NonZeroU64,
    pub timing: PressTiming,
    /// A hold with no client traffic for this long is cancelled.
    pub hold_idle_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = PressTiming::default();

        let port = parse(&lookup, "PORT", "a port number")?.unwrap_or(DEFAULT_PORT);
        let data_path = lookup("APP_DATA_PATH")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let target = parse::<NonZeroU64>(&lookup, "TASBIH_TARGET", "a positive integer")?
            .or_else(|| NonZeroU64::new(DEFAULT_TARGET))
            .unwrap_or(NonZeroU64::MIN);
        let hold = parse::<u64>(&lookup, "TASBIH_HOLD_MS", "milliseconds")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.hold_threshold);
        let repeat = parse::<NonZeroU64>(&lookup, "TASBIH_REPEAT_MS", "positive milliseconds")?
            .map(|ms| Duration::from_millis(ms.get()))
            .unwrap_or(defaults.repeat_interval);
        let hold_idle_timeout =
            parse::<NonZeroU64>(&lookup, "TASBIH_HOLD_IDLE_MS", "positive milliseconds")?
                .map(|ms| Duration::from_millis(ms.get()))
                .unwrap_or(DEFAULT_HOLD_IDLE_TIMEOUT);

        Ok(Self {
            port,
            data_path,
            target,
            timing: PressTiming {
                hold_threshold: hold,
                repeat_interval: repeat,
            },
            hold_idle_timeout,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        })
}
