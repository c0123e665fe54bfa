use camino::Utf8PathBuf;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::net::IpAddr;
use ydocs_common::ParseFailurePolicy;

pub const CONFIG_DIR: &str = "configuration";
pub const ENV_PREFIX: &str = "YDOCS";

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub app_settings: AppSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: IpAddr,
    pub source_dir: Utf8PathBuf,
    pub on_parse_error: ParseFailurePolicy,
}

/// Defaults, then `configuration/config.{yml,yaml}`, then `YDOCS__*` variables.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|err| ConfigError::Foreign(Box::new(err)))?;
    let config_dir = base_path.join(CONFIG_DIR);

    builder()?
        .add_source(File::from(config_dir.join("config")).required(false))
        .add_source(environment(None))
        .build()?
        .try_deserialize()
}

/// `YDOCS__APP_SETTINGS__PORT=9000` sets `app_settings.port`. Reads the
/// process environment unless `vars` is given.
fn environment(vars: Option<config::Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .source(vars)
}

fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app_settings.name", "ydocs")?
        .set_default("app_settings.port", "8000")?
        .set_default("app_settings.host", "127.0.0.1")?
        .set_default("app_settings.source_dir", "yml")?
        .set_default("app_settings.on_parse_error", "abort")
}
