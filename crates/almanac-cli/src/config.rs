use almanac_core::clock::TickUnit;
use almanac_core::timeline::TimelineConfig;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// Where the calendar is stored when `--file` is not given
    pub calendar_file: PathBuf,
    pub timeline: TimelineConfig,
    pub driver: DriverConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar_file: PathBuf::from("almanac.json"),
            timeline: TimelineConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}

/// Defaults for `almanac tick`
#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct DriverConfig {
    pub tick_unit: TickUnit,
    pub tick_amount: i64,
    pub ticks: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_unit: TickUnit::Minute,
            tick_amount: 1,
            ticks: 1,
        }
    }
}

impl Config {
    /// Loads `almanac.toml` from the working directory, then `ALMANAC_` environment
    /// variables on top (`ALMANAC_DRIVER__TICK_UNIT=hour`).
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("almanac.toml"))
            .merge(Env::prefixed("ALMANAC_").split("__"))
            .extract()
    }
}
