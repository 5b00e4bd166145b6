use anyhow::anyhow;
use entities::locations::{LocationInput, LocationQuery};
use entities::periods::FiscalYear;
use entities::rates::RateEnvelope;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use shared_kernel::http_client::HttpClient;
use std::collections::HashMap;
use thiserror::Error;
use url::Url;

use crate::config::{GsaConfig, ProxySettings, ResponseMode};

const API_KEY_HEADER: &str = "X-API-KEY";

#[derive(Error, Debug)]
pub enum FetchRatesError {
    #[error("{0}")]
    InvalidRequest(String),
    /// The cause is logged where it happens, never returned.
    #[error("Failed to fetch data from GSA API")]
    Upstream,
}

/// A validated proxy request. `month` is carried for diagnostics only; the
/// upstream is keyed by year and month filtering happens on the caller's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesRequest {
    pub location: LocationQuery,
    pub year: FiscalYear,
    pub month: Option<String>,
}

/// Raw query parameters as received by the proxy endpoint.
#[derive(Debug, Default)]
pub struct RatesParams<'a> {
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
    pub year: Option<&'a str>,
    pub month: Option<&'a str>,
}

impl RatesRequest {
    pub fn parse(
        params: RatesParams<'_>,
        settings: &ProxySettings,
    ) -> Result<Self, FetchRatesError> {
        let location = LocationQuery::parse(
            LocationInput {
                city: params.city,
                state: params.state,
                zip: params.zip,
            },
            settings.location_precedence,
        )
        .map_err(|err| FetchRatesError::InvalidRequest(err.to_string()))?;
        let year = params
            .year
            .ok_or_else(|| FetchRatesError::InvalidRequest("A year is required.".to_string()))
            .and_then(|year| {
                FiscalYear::try_from(year)
                    .map_err(|err| FetchRatesError::InvalidRequest(err.to_string()))
            })?;

        Ok(Self {
            location,
            year,
            month: params
                .month
                .map(str::trim)
                .filter(|month| !month.is_empty())
                .map(str::to_string),
        })
    }
}

/// `{host}/rates/zip/{zip}/year/{year}` or
/// `{host}/rates/city/{city}/state/{state}/year/{year}`.
pub fn upstream_url(
    host: &Url,
    location: &LocationQuery,
    year: FiscalYear,
) -> anyhow::Result<Url> {
    let mut url = host.clone();
    let year = year.to_string();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| anyhow!("{host} cannot be used as a base url"))?;
        segments.pop_if_empty();
        match location {
            LocationQuery::Zip { zip } => {
                segments.extend(["rates", "zip", zip.as_str()]);
            }
            LocationQuery::CityState { city, state } => {
                segments.extend(["rates", "city", city.as_str(), "state", state.as_str()]);
            }
        }
        segments.extend(["year", year.as_str()]);
    }
    Ok(url)
}

fn shape_response(value: Value, mode: ResponseMode) -> Value {
    match mode {
        ResponseMode::Passthrough => value,
        ResponseMode::RatesOnly => {
            let rates = value
                .get("rates")
                .filter(|rates| rates.is_array())
                .cloned()
                .unwrap_or_else(|| json!([]));
            json!({ "rates": rates })
        }
    }
}

fn log_response_shape(value: &Value) {
    match RateEnvelope::from_value(value) {
        Ok(envelope) => {
            let summary = envelope.shape_summary();
            tracing::debug!(
                has_rates = summary.has_rates,
                locations = summary.locations,
                rows = summary.rows,
                shape = ?summary.shape,
                "Received per diem rates"
            );
        }
        Err(err) => tracing::debug!(error = %err, "Per diem response is not a rate envelope"),
    }
}

#[tracing::instrument(err, skip(gsa, settings), level = "info")]
pub(crate) async fn execute(
    request: &RatesRequest,
    gsa: &GsaConfig,
    settings: &ProxySettings,
) -> Result<Value, FetchRatesError> {
    let url = upstream_url(&gsa.host, &request.location, request.year).map_err(|err| {
        tracing::error!(error = ?err, "Failed to build GSA url");
        FetchRatesError::Upstream
    })?;

    let headers = HashMap::from([(API_KEY_HEADER, gsa.api_key.expose_secret().to_string())]);
    let response = HttpClient::get_with_headers::<Value>(url, headers)
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "Failed to fetch data from GSA API");
            FetchRatesError::Upstream
        })?;

    log_response_shape(&response);
    Ok(shape_response(response, settings.response_mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::RatesProxy;
    use entities::locations::LocationPrecedence;
    use httpmock::prelude::*;
    use secrecy::Secret;

    const API_KEY: &str = "test-api-key";

    fn gsa_config(server: &MockServer) -> GsaConfig {
        GsaConfig {
            host: Url::parse(&server.base_url()).unwrap(),
            api_key: Secret::new(API_KEY.to_string()),
        }
    }

    fn request(params: RatesParams<'_>) -> RatesRequest {
        RatesRequest::parse(params, &ProxySettings::default()).unwrap()
    }

    fn gsa_body() -> Value {
        json!({
            "request": null,
            "errors": null,
            "rates": [{
                "oconus": false,
                "state": "TX",
                "year": 2025,
                "rate": [{
                    "city": "Austin",
                    "county": "Travis",
                    "meals": 74,
                    "months": { "month": [{ "value": 177, "number": 1, "short": "Jan", "long": "January" }] }
                }]
            }]
        })
    }

    #[test]
    fn test_zip_url_form() {
        let host = Url::parse("https://api.gsa.gov/travel/perdiem/v2").unwrap();
        let location = request(RatesParams {
            zip: Some("78701"),
            year: Some("2025"),
            ..Default::default()
        });
        let url = upstream_url(&host, &location.location, location.year).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.gsa.gov/travel/perdiem/v2/rates/zip/78701/year/2025"
        );
    }

    #[test]
    fn test_city_state_url_form_is_percent_encoded() {
        let host = Url::parse("https://api.gsa.gov/travel/perdiem/v2/").unwrap();
        let location = request(RatesParams {
            city: Some("New York"),
            state: Some("ny"),
            year: Some("2025"),
            ..Default::default()
        });
        let url = upstream_url(&host, &location.location, location.year).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.gsa.gov/travel/perdiem/v2/rates/city/New%20York/state/NY/year/2025"
        );
    }

    #[test]
    fn test_that_zip_takes_precedence_over_city_and_state() {
        let parsed = request(RatesParams {
            city: Some("Austin"),
            state: Some("TX"),
            zip: Some("10001"),
            year: Some("2025"),
            month: Some("Jun"),
        });
        assert_eq!(parsed.location.query_pairs(), vec![("zip", "10001".to_string())]);
        assert_eq!(parsed.month.as_deref(), Some("Jun"));
    }

    #[test]
    fn test_that_city_state_precedence_is_configurable() {
        let settings = ProxySettings {
            location_precedence: LocationPrecedence::CityStateFirst,
            ..Default::default()
        };
        let parsed = RatesRequest::parse(
            RatesParams {
                city: Some("Austin"),
                state: Some("TX"),
                zip: Some("10001"),
                year: Some("2025"),
                month: None,
            },
            &settings,
        )
        .unwrap();
        assert!(matches!(parsed.location, LocationQuery::CityState { .. }));
    }

    #[test]
    fn test_that_requests_without_location_or_year_are_invalid() {
        let settings = ProxySettings::default();
        let no_location = RatesRequest::parse(
            RatesParams {
                year: Some("2025"),
                ..Default::default()
            },
            &settings,
        );
        assert!(matches!(no_location, Err(FetchRatesError::InvalidRequest(_))));

        let no_year = RatesRequest::parse(
            RatesParams {
                zip: Some("78701"),
                ..Default::default()
            },
            &settings,
        );
        assert!(matches!(no_year, Err(FetchRatesError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_that_zip_requests_reach_upstream_with_the_credential() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rates/zip/78701/year/2025")
                    .header(API_KEY_HEADER, API_KEY);
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(gsa_body());
            })
            .await;

        let proxy = RatesProxy::new(gsa_config(&server), ProxySettings::default());
        let result = proxy
            .fetch_rates(&request(RatesParams {
                zip: Some("78701"),
                year: Some("2025"),
                month: Some("06"),
                ..Default::default()
            }))
            .await
            .unwrap();

        mock.assert_hits_async(1).await;
        assert_eq!(result, gsa_body());
    }

    #[tokio::test]
    async fn test_that_city_state_requests_use_the_city_form() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rates/city/Austin/state/TX/year/2025")
                    .header(API_KEY_HEADER, API_KEY);
                then.status(200).json_body(gsa_body());
            })
            .await;

        let proxy = RatesProxy::new(gsa_config(&server), ProxySettings::default());
        let result = proxy
            .fetch_rates(&request(RatesParams {
                city: Some("Austin"),
                state: Some("tx"),
                year: Some("2025"),
                ..Default::default()
            }))
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_that_rates_only_mode_reshapes_the_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rates/zip/78701/year/2025");
                then.status(200).json_body(gsa_body());
            })
            .await;

        let settings = ProxySettings {
            response_mode: ResponseMode::RatesOnly,
            ..Default::default()
        };
        let proxy = RatesProxy::new(gsa_config(&server), settings);
        let result = proxy
            .fetch_rates(&request(RatesParams {
                zip: Some("78701"),
                year: Some("2025"),
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(result, json!({ "rates": gsa_body()["rates"] }));
    }

    #[tokio::test]
    async fn test_that_upstream_failures_are_generic() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/rates/zip/78701/year/2025");
                then.status(403)
                    .json_body(json!({ "error": { "code": "API_KEY_INVALID", "key": API_KEY } }));
            })
            .await;

        let proxy = RatesProxy::new(gsa_config(&server), ProxySettings::default());
        let result = proxy
            .fetch_rates(&request(RatesParams {
                zip: Some("78701"),
                year: Some("2025"),
                ..Default::default()
            }))
            .await;

        // exactly one upstream call, no retries
        mock.assert_hits_async(1).await;
        let err = result.unwrap_err();
        assert!(matches!(err, FetchRatesError::Upstream));
        assert_eq!(err.to_string(), "Failed to fetch data from GSA API");
    }

    #[test]
    fn test_rates_only_without_rates_is_an_empty_list() {
        assert_eq!(
            shape_response(json!({ "errors": ["nope"] }), ResponseMode::RatesOnly),
            json!({ "rates": [] })
        );
    }
}
