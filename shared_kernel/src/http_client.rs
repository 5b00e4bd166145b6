use anyhow::{Context, Error};
use lazy_static::lazy_static;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Response;
use reqwest_tracing::TracingMiddleware;
use std::collections::HashMap;
use thiserror::Error as ThisError;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use url::Url;

lazy_static! {
    // No retry middleware: every call must reach the remote exactly once.
    static ref CLIENT: ClientWithMiddleware = ClientBuilder::new(reqwest::Client::new())
        .with(TracingMiddleware::default())
        .build();
}

pub struct HttpClient;

#[derive(ThisError, Debug)]
pub enum HttpClientError {
    #[error(transparent)]
    ResponseError(#[from] Error),
    #[error("httpBuilderError {0}")]
    HTTPBuilderError(String),
    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: Url },
}

struct HeadersMapGenerator(HeaderMap);

impl HeadersMapGenerator {
    fn into_inner(self) -> HeaderMap {
        self.0
    }
}

impl TryFrom<HashMap<&'static str, String>> for HeadersMapGenerator {
    type Error = HttpClientError;

    fn try_from(value: HashMap<&'static str, String>) -> Result<Self, Self::Error> {
        let mut header_map = HeaderMap::new();

        for (key, value) in value.into_iter() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|err| HttpClientError::HTTPBuilderError(format!("{err} {key}")))?;
            // header values may carry credentials, so only the header name is reported
            let value = HeaderValue::from_str(&value)
                .map_err(|err| HttpClientError::HTTPBuilderError(format!("{err} for {key}")))?;
            header_map.insert(name, value);
        }
        Ok(Self(header_map))
    }
}

impl HttpClient {
    async fn send(url: Url, headers: HeaderMap) -> Result<Response, HttpClientError> {
        let response = CLIENT
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .with_context(|| format!("Failed to fetch request from {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response)
    }

    pub async fn get_json<DTO: DeserializeOwned>(url: Url) -> Result<DTO, HttpClientError> {
        Self::send(url, HeaderMap::new())
            .await?
            .json::<DTO>()
            .await
            .context("Failed to deserialize response")
            .map_err(HttpClientError::ResponseError)
    }

    pub async fn get_with_headers<DTO: DeserializeOwned>(
        url: Url,
        headers: HashMap<&'static str, String>,
    ) -> Result<DTO, HttpClientError> {
        let generator = HeadersMapGenerator::try_from(headers)?;
        let header_map = generator.into_inner();
        Self::send(url, header_map)
            .await?
            .json::<DTO>()
            .await
            .context("Failed to deserialize response")
            .map_err(HttpClientError::ResponseError)
    }
}
