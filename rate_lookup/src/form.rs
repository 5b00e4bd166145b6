use entities::locations::{LocationError, LocationInput, LocationPrecedence, LocationQuery};
use entities::periods::{PeriodError, PeriodInput, PeriodQuery};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Period(#[from] PeriodError),
}

/// Lookup fields exactly as a user typed them. Either `date`, or `month` and
/// `year`, describe the period.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct LookupForm {
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub date: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

/// A form that passed validation. Only these are ever sent to the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupQuery {
    pub location: LocationQuery,
    pub period: PeriodQuery,
}

impl LookupForm {
    pub fn validate(&self, precedence: LocationPrecedence) -> Result<LookupQuery, ValidationError> {
        let period = PeriodQuery::parse(PeriodInput {
            date: self.date.as_deref(),
            month: self.month.as_deref(),
            year: self.year.as_deref(),
        })?;
        let location = LocationQuery::parse(
            LocationInput {
                city: self.city.as_deref(),
                state: self.state.as_deref(),
                zip: self.zip.as_deref(),
            },
            precedence,
        )?;
        Ok(LookupQuery { location, period })
    }
}

impl LookupQuery {
    /// Query string for the proxy. The month goes out in its numeric form.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.location.query_pairs();
        pairs.push(("year", self.period.year.to_string()));
        pairs.push(("month", self.period.month.number().to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(
        city: &str,
        state: &str,
        zip: &str,
        date: &str,
        month: &str,
        year: &str,
    ) -> LookupForm {
        let field = |value: &str| Some(value.to_string()).filter(|value| !value.is_empty());
        LookupForm {
            city: field(city),
            state: field(state),
            zip: field(zip),
            date: field(date),
            month: field(month),
            year: field(year),
        }
    }

    #[test]
    fn test_that_a_zip_and_date_form_is_valid() {
        let query = form("", "", "78701", "2025-06-12", "", "")
            .validate(LocationPrecedence::ZipFirst)
            .unwrap();
        assert_eq!(
            query.query_pairs(),
            vec![
                ("zip", "78701".to_string()),
                ("year", "2025".to_string()),
                ("month", "6".to_string()),
            ]
        );
    }

    #[rstest]
    #[case("Jun")]
    #[case("06")]
    #[case("6")]
    fn test_that_every_month_form_produces_the_same_query(#[case] month: &str) {
        let query = form("Austin", "tx", "", "", month, "2025")
            .validate(LocationPrecedence::ZipFirst)
            .unwrap();
        assert_eq!(
            query.query_pairs(),
            vec![
                ("city", "Austin".to_string()),
                ("state", "TX".to_string()),
                ("year", "2025".to_string()),
                ("month", "6".to_string()),
            ]
        );
    }

    #[rstest]
    #[case(form("", "", "", "2025-06-12", "", ""), "Please provide either a ZIP code or both city and state.")]
    #[case(form("Austin", "", "", "2025-06-12", "", ""), "Please provide either a ZIP code or both city and state.")]
    #[case(form("", "", "78701", "", "", ""), "Please provide a date, or both a month and a year.")]
    #[case(form("", "", "78701", "", "Jun", ""), "Please provide a date, or both a month and a year.")]
    #[case(form("", "", "78701", "", "Junee", "2025"), "Unrecognised month: Junee")]
    #[case(form("Austin", "Texas", "", "", "Jun", "2025"), "State must be a 2-letter code.")]
    fn test_validation_messages(#[case] form: LookupForm, #[case] message: &str) {
        let err = form.validate(LocationPrecedence::ZipFirst).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}
