use anyhow::Context;
use async_trait::async_trait;
use entities::rates::RateEnvelope;
use rate_lookup::config::LookupSettings;
use rate_lookup::contracts::{RateLookupInteractor, RatesProxyApi};
use rate_lookup::form::LookupQuery;
use rate_lookup::proxy_client::ProxyClient;
use rates_proxy::contracts::fetch_rates::RatesRequest;
use rates_proxy::contracts::RatesProxy;
use std::sync::Arc;

/// Lets the lookup flow use the proxy living in this process, skipping the
/// http hop.
struct InProcessRatesProxy(RatesProxy);

#[async_trait]
impl RatesProxyApi for InProcessRatesProxy {
    async fn fetch_rates(&self, query: &LookupQuery) -> anyhow::Result<RateEnvelope> {
        let request = RatesRequest {
            location: query.location.clone(),
            year: query.period.year,
            month: Some(query.period.month.number().to_string()),
        };
        let value = self.0.fetch_rates(&request).await?;
        RateEnvelope::from_value(&value).context("Proxy response is not a rate envelope")
    }
}

pub struct Application {
    pub rates_proxy: RatesProxy,
    pub rate_lookup: RateLookupInteractor,
}

impl Application {
    pub fn new(rates_proxy: RatesProxy, lookup: LookupSettings) -> Self {
        let proxy_api: Arc<dyn RatesProxyApi> = match lookup.proxy_url {
            Some(url) => {
                tracing::info!(%url, "Lookups go through a remote rates proxy");
                Arc::new(ProxyClient::new(url))
            }
            None => Arc::new(InProcessRatesProxy(rates_proxy.clone())),
        };
        Application {
            rate_lookup: RateLookupInteractor::new(proxy_api, lookup.location_precedence),
            rates_proxy,
        }
    }
}
