use anyhow::Context;
use entities::locations::LocationPrecedence;
use secrecy::Secret;
use serde::Deserialize;
use shared_kernel::configuration::config;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct GsaConfig {
    pub host: Url,
    pub api_key: Secret<String>,
}

/// Body returned to callers on success.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Upstream json, untouched.
    #[default]
    Passthrough,
    /// Only `{ "rates": [...] }`.
    RatesOnly,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct ProxySettings {
    #[serde(default)]
    pub response_mode: ResponseMode,
    #[serde(default)]
    pub location_precedence: LocationPrecedence,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub gsa: GsaConfig,
    #[serde(default)]
    pub proxy: ProxySettings,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Settings> {
        config::<Settings>().context("Failed to deserialize settings to rates_proxy settings")
    }
}
