use serde::{Serialize, Serializer};

/// A U.S. dollar amount rendered as `$` plus two decimals. Unknown and
/// non-finite amounts render as `$0.00`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usd(Option<f64>);

impl Usd {
    pub fn amount(&self) -> f64 {
        match self.0 {
            // also folds -0.0 into 0.0
            Some(value) if value.is_finite() && value != 0.0 => value,
            _ => 0.0,
        }
    }
}

impl From<f64> for Usd {
    fn from(value: f64) -> Self {
        Usd(Some(value))
    }
}

impl From<Option<f64>> for Usd {
    fn from(value: Option<f64>) -> Self {
        Usd(value)
    }
}

impl std::fmt::Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "${:.2}", self.amount())
    }
}

impl Serialize for Usd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub fn format_currency(value: impl Into<Usd>) -> String {
    value.into().to_string()
}
