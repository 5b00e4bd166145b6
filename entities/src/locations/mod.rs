use serde::{Deserialize, Serialize};
use shared_kernel::non_empty_string;
use thiserror::Error;

non_empty_string!(City);
non_empty_string!(ZipCode);

/// Two letter, upper case U.S. state code.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct StateCode(String);

impl StateCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<&str> for StateCode {
    type Error = LocationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.len() != 2 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocationError::InvalidState(value.to_string()));
        }
        Ok(StateCode(value.to_ascii_uppercase()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Please provide either a ZIP code or both city and state.")]
    Missing,
    #[error("State must be a 2-letter code.")]
    InvalidState(String),
}

/// Which location form wins when a caller supplies both a ZIP code and a city/state pair.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationPrecedence {
    #[default]
    ZipFirst,
    CityStateFirst,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationQuery {
    Zip { zip: ZipCode },
    CityState { city: City, state: StateCode },
}

/// Raw location fields as typed by a user. Blank fields count as absent.
#[derive(Clone, Debug, Default)]
pub struct LocationInput<'a> {
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: Option<&'a str>,
}

impl LocationQuery {
    pub fn parse(
        input: LocationInput<'_>,
        precedence: LocationPrecedence,
    ) -> Result<Self, LocationError> {
        let zip = input.zip.and_then(|zip| ZipCode::try_from(zip).ok());
        let city = input.city.and_then(|city| City::try_from(city).ok());
        let state = input.state.filter(|state| !state.trim().is_empty());

        let city_state = match (city, state) {
            (Some(city), Some(state)) => Some((city, state)),
            _ => None,
        };

        match (precedence, zip, city_state) {
            (LocationPrecedence::ZipFirst, Some(zip), _)
            | (LocationPrecedence::CityStateFirst, Some(zip), None) => {
                Ok(LocationQuery::Zip { zip })
            }
            (_, _, Some((city, state))) => Ok(LocationQuery::CityState {
                city,
                state: StateCode::try_from(state)?,
            }),
            (_, None, None) => Err(LocationError::Missing),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::Zip { zip } => vec![("zip", zip.inner())],
            LocationQuery::CityState { city, state } => {
                vec![("city", city.inner()), ("state", state.to_string())]
            }
        }
    }
}
