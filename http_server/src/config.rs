use anyhow::Context;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use shared_kernel::configuration::config;

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Settings> {
        config::<Settings>().context("Failed to deserialize settings to http_server settings")
    }
}
