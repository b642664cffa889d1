use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use tracing::info;

pub const DEFAULT_PORT: &str = "8000";
pub const DEFAULT_DATA_FILE: &str = "projects_data.json";
pub const DEFAULT_EXPORT_DIR: &str = ".";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub export_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", DEFAULT_PORT)?,
            data_file: try_load("DATA_FILE", DEFAULT_DATA_FILE)?,
            export_dir: try_load("EXPORT_DIR", DEFAULT_EXPORT_DIR)?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: Display,
{
    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}
