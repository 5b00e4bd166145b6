use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use rates_proxy::contracts::fetch_rates::FetchRatesError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Failed to fetch data from GSA API")]
    UpstreamUnavailable,
}

impl From<FetchRatesError> for ApiError {
    fn from(value: FetchRatesError) -> Self {
        match value {
            FetchRatesError::InvalidRequest(message) => ApiError::BadRequest(message),
            FetchRatesError::Upstream => ApiError::UpstreamUnavailable,
        }
    }
}

impl error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match *self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let err_json = json!({ "message": self.to_string() });
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(err_json)
    }
}
