//! Wire types for the upstream per-diem response.
//!
//! The upstream has been seen returning two entry shapes, so the entry types are
//! untagged unions and the shape is decided by which fields are present. Anything
//! that matches neither shape is kept as raw json and ignored during resolution.

mod resolution;

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};

pub use resolution::{MonthlyRate, NoDataError, RateTable, ResolvedRate};

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct RateEnvelope {
    #[serde(default)]
    pub rates: Option<Vec<RateLocation>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RateLocation {
    Wrapped { rate: Vec<RateEntry> },
    /// A flat row placed straight into `rates` without a per-location wrapper.
    Row(FlatRate),
    Unrecognised(serde_json::Value),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RateEntry {
    Nested(NestedRate),
    Flat(FlatRate),
    Unrecognised(serde_json::Value),
}

/// One row per month. `month` is read as any number (`6`, `6.0`, `"6"`) and
/// only rows holding a whole month number are kept.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FlatRate {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub month: f64,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub meals: Option<f64>,
}

/// Per-month lodging nested under `months.month`, with meals constant for the entry.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NestedRate {
    pub months: NestedMonths,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub mie: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub meals: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub rate: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NestedMonths {
    #[serde(default)]
    pub month: Vec<NestedMonthValue>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NestedMonthValue {
    pub short: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub value: Option<f64>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RateShape {
    Empty,
    Flat,
    Nested,
    Mixed,
    Unrecognised,
}

/// What a response looked like, for diagnostics. Carries no rate values.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShapeSummary {
    pub has_rates: bool,
    pub locations: usize,
    pub rows: usize,
    pub shape: RateShape,
}

impl RateEnvelope {
    pub fn from_value(value: &serde_json::Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    pub fn locations(&self) -> &[RateLocation] {
        self.rates.as_deref().unwrap_or_default()
    }

    pub fn shape_summary(&self) -> ShapeSummary {
        let table = RateTable::ingest(self);
        ShapeSummary {
            has_rates: self.rates.is_some(),
            locations: self.locations().len(),
            rows: table.as_ref().map(|table| table.rows().len()).unwrap_or(0),
            shape: table.map(|table| table.shape()).unwrap_or(RateShape::Empty),
        }
    }
}
