use async_trait::async_trait;
use entities::locations::LocationPrecedence;
use entities::rates::{RateEnvelope, ResolvedRate};
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;

use crate::form::{LookupForm, LookupQuery};
use crate::state::{FetchEvent, FetchState, LookupError};

/// The rates proxy as seen from the lookup flow.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RatesProxyApi: Send + Sync {
    async fn fetch_rates(&self, query: &LookupQuery) -> anyhow::Result<RateEnvelope>;
}

pub struct RateLookupInteractor {
    proxy: Arc<dyn RatesProxyApi>,
    precedence: LocationPrecedence,
}

impl RateLookupInteractor {
    pub fn new(proxy: Arc<dyn RatesProxyApi>, precedence: LocationPrecedence) -> Self {
        Self { proxy, precedence }
    }

    /// Runs one fetch action from `Idle` through `Loading` to its outcome.
    pub async fn fetch(&self, form: &LookupForm) -> FetchState {
        let loading = FetchState::default().transition(FetchEvent::Submit);
        let event = match self.lookup(form).await {
            Ok(rate) => FetchEvent::Success(rate),
            Err(err) => FetchEvent::Failure(err),
        };
        loading.transition(event)
    }

    #[tracing::instrument(err, skip(self), level = "info")]
    async fn lookup(&self, form: &LookupForm) -> Result<ResolvedRate, LookupError> {
        let query = form.validate(self.precedence)?;
        let envelope = self.proxy.fetch_rates(&query).await.map_err(|err| {
            tracing::error!(error = ?err, "Failed to fetch rates from the proxy");
            LookupError::Upstream
        })?;
        Ok(envelope.resolve(query.period.month)?)
    }
}
