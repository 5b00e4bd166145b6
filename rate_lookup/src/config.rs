use anyhow::Context;
use entities::locations::LocationPrecedence;
use serde::Deserialize;
use shared_kernel::configuration::config;
use url::Url;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LookupSettings {
    /// Base url of a remote rates proxy. When absent the lookup runs against
    /// the proxy in the same process.
    #[serde(default)]
    pub proxy_url: Option<Url>,
    #[serde(default)]
    pub location_precedence: LocationPrecedence,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub lookup: LookupSettings,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Settings> {
        config::<Settings>().context("Failed to deserialize settings to rate_lookup settings")
    }
}
