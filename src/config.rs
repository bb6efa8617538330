use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Which clock the GPS datestamp is rendered in.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatestampZone {
    #[default]
    Utc,
    Local,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub datestamp_zone: DatestampZone,
    pub sidecar_extension: String,
    pub reset_orientation: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            datestamp_zone: DatestampZone::Utc,
            sidecar_extension: "exif.json".into(),
            reset_orientation: false,
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = AppConfig::default();

        let s = Config::builder()
            .set_default("log_level", defaults.log_level)?
            .set_default("datestamp_zone", "utc")?
            .set_default("sidecar_extension", defaults.sidecar_extension)?
            .set_default("reset_orientation", defaults.reset_orientation)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("GEOTAG"))
            .build()?;

        s.try_deserialize()
    }
}
