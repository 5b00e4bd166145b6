use anyhow::{anyhow, Context};
use async_trait::async_trait;
use entities::rates::RateEnvelope;
use shared_kernel::http_client::HttpClient;
use url::Url;

use crate::contracts::RatesProxyApi;
use crate::form::LookupQuery;

/// Calls a rates proxy deployed behind `base_url` (`GET {base_url}/rates?...`).
pub struct ProxyClient {
    base_url: Url,
}

impl ProxyClient {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn rates_url(&self, query: &LookupQuery) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("{} cannot be used as a base url", self.base_url))?
            .pop_if_empty()
            .push("rates");
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        Ok(url)
    }
}

#[async_trait]
impl RatesProxyApi for ProxyClient {
    #[tracing::instrument(err, skip(self), level = "info")]
    async fn fetch_rates(&self, query: &LookupQuery) -> anyhow::Result<RateEnvelope> {
        let url = self.rates_url(query)?;
        HttpClient::get_json::<RateEnvelope>(url)
            .await
            .context("Failed to fetch rates from proxy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::LookupForm;
    use entities::locations::LocationPrecedence;
    use httpmock::prelude::*;
    use serde_json::json;

    fn query(form: LookupForm) -> LookupQuery {
        form.validate(LocationPrecedence::ZipFirst).unwrap()
    }

    #[test]
    fn test_rates_url() {
        let client = ProxyClient::new(Url::parse("https://per-diem.example.com/api/").unwrap());
        let url = client
            .rates_url(&query(LookupForm {
                city: Some("Santa Fe".to_string()),
                state: Some("nm".to_string()),
                date: Some("2025-10-03".to_string()),
                ..Default::default()
            }))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://per-diem.example.com/api/rates?city=Santa+Fe&state=NM&year=2025&month=10"
        );
    }

    #[tokio::test]
    async fn test_that_the_proxy_response_is_read_as_an_envelope() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rates")
                    .query_param("zip", "78701")
                    .query_param("year", "2025")
                    .query_param("month", "6");
                then.status(200).json_body(json!({
                    "rates": [{ "rate": [{ "month": 6, "value": 96, "meals": 59 }] }]
                }));
            })
            .await;

        let client = ProxyClient::new(Url::parse(&server.base_url()).unwrap());
        let envelope = client
            .fetch_rates(&query(LookupForm {
                zip: Some("78701".to_string()),
                month: Some("Jun".to_string()),
                year: Some("2025".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(envelope.locations().len(), 1);
    }

    #[tokio::test]
    async fn test_that_a_proxy_error_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rates");
                then.status(500)
                    .json_body(json!({ "message": "Failed to fetch data from GSA API" }));
            })
            .await;

        let client = ProxyClient::new(Url::parse(&server.base_url()).unwrap());
        let result = client
            .fetch_rates(&query(LookupForm {
                zip: Some("78701".to_string()),
                date: Some("2025-06-01".to_string()),
                ..Default::default()
            }))
            .await;
        assert!(result.is_err());
    }
}
