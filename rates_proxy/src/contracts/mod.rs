use serde_json::Value;

use crate::config::{GsaConfig, ProxySettings};
use crate::contracts::fetch_rates::{FetchRatesError, RatesRequest};

pub mod fetch_rates;

/// Server-side gateway to the GSA per diem API. Holds the credential; callers
/// only ever see the json it returns or a generic failure.
#[derive(Clone)]
pub struct RatesProxy {
    gsa: GsaConfig,
    settings: ProxySettings,
}

impl RatesProxy {
    pub fn new(gsa: GsaConfig, settings: ProxySettings) -> Self {
        Self { gsa, settings }
    }

    pub fn settings(&self) -> &ProxySettings {
        &self.settings
    }

    pub async fn fetch_rates(&self, request: &RatesRequest) -> Result<Value, FetchRatesError> {
        fetch_rates::execute(request, &self.gsa, &self.settings).await
    }
}
