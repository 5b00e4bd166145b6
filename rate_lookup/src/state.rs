use entities::currency::Usd;
use entities::periods::Month;
use entities::rates::{NoDataError, ResolvedRate};
use serde::Serialize;
use thiserror::Error;

use crate::form::ValidationError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NoData(#[from] NoDataError),
    /// Whatever went wrong on the way to the proxy, users only see this.
    #[error("Failed to fetch data.")]
    Upstream,
}

/// Display fields for a resolved month.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RateSummary {
    pub month: Month,
    pub lodging: Usd,
    pub meals: Usd,
    pub weekly_total: Usd,
}

impl From<ResolvedRate> for RateSummary {
    fn from(rate: ResolvedRate) -> Self {
        Self {
            month: rate.month,
            lodging: rate.lodging.into(),
            meals: rate.meals.into(),
            weekly_total: rate.weekly_total().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    Submit,
    Success(ResolvedRate),
    Failure(LookupError),
    Reset,
}

/// Outcome of the latest fetch. There is no request sequencing: whichever
/// response arrives last decides the state.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Resolved { rate: RateSummary },
    ValidationError { message: String },
    NotFound { message: String },
    NetworkError { message: String },
}

impl FetchState {
    pub fn transition(self, event: FetchEvent) -> FetchState {
        match event {
            FetchEvent::Submit => FetchState::Loading,
            FetchEvent::Reset => FetchState::Idle,
            FetchEvent::Success(rate) => FetchState::Resolved { rate: rate.into() },
            FetchEvent::Failure(err) => {
                let message = err.to_string();
                match err {
                    LookupError::Validation(_) => FetchState::ValidationError { message },
                    LookupError::NoData(_) => FetchState::NotFound { message },
                    LookupError::Upstream => FetchState::NetworkError { message },
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// The single inline message shown for any failed outcome.
    pub fn message(&self) -> Option<&str> {
        match self {
            FetchState::ValidationError { message }
            | FetchState::NotFound { message }
            | FetchState::NetworkError { message } => Some(message),
            _ => None,
        }
    }
}
