use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

use crate::periods::Month;
use crate::rates::{FlatRate, NestedRate, RateEntry, RateEnvelope, RateLocation, RateShape};

const DAYS_PER_WEEK: f64 = 7.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoDataError {
    #[error("No data found for this location/year.")]
    NoRatesForLocation,
    #[error("No data found for the selected month ({0}).")]
    NoRateForMonth(Month),
}

/// Lodging and meals for one month, whatever shape it was read from.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRate {
    pub month: Month,
    pub lodging: Option<f64>,
    pub meals: Option<f64>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRate {
    pub month: Month,
    pub lodging: Option<f64>,
    pub meals: Option<f64>,
}

impl ResolvedRate {
    /// `(lodging + meals) * 7`. `None` when either daily value is unknown.
    pub fn weekly_total(&self) -> Option<f64> {
        Some((self.lodging? + self.meals?) * DAYS_PER_WEEK)
    }
}

impl From<&MonthlyRate> for ResolvedRate {
    fn from(rate: &MonthlyRate) -> Self {
        Self {
            month: rate.month,
            lodging: rate.lodging,
            meals: rate.meals,
        }
    }
}

/// Canonical form of the first location in a response.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    shape: RateShape,
    rows: Vec<MonthlyRate>,
}

fn flat_month(month: f64) -> Option<Month> {
    if month.fract() != 0.0 || !(1.0..=12.0).contains(&month) {
        return None;
    }
    Month::from_number(month as u32)
}

fn flat_rows(flat: &FlatRate) -> Vec<MonthlyRate> {
    flat_month(flat.month)
        .map(|month| MonthlyRate {
            month,
            lodging: flat.value,
            meals: flat.meals,
        })
        .into_iter()
        .collect()
}

fn nested_rows(nested: &NestedRate) -> Vec<MonthlyRate> {
    let meals = nested.mie.or(nested.meals);
    nested
        .months
        .month
        .iter()
        .filter_map(|value| {
            let month = Month::parse(&value.short).ok()?;
            Some(MonthlyRate {
                month,
                lodging: value.value.or(nested.rate),
                meals,
            })
        })
        .collect()
}

fn entry_rows(entry: &RateEntry) -> (RateShape, Vec<MonthlyRate>) {
    match entry {
        RateEntry::Flat(flat) => (RateShape::Flat, flat_rows(flat)),
        RateEntry::Nested(nested) => (RateShape::Nested, nested_rows(nested)),
        RateEntry::Unrecognised(_) => (RateShape::Unrecognised, vec![]),
    }
}

fn combined_shape(shapes: &[RateShape]) -> RateShape {
    let known = shapes
        .iter()
        .filter(|shape| **shape != RateShape::Unrecognised)
        .unique()
        .collect_vec();
    match known.as_slice() {
        [] if shapes.is_empty() => RateShape::Empty,
        [] => RateShape::Unrecognised,
        [shape] => **shape,
        _ => RateShape::Mixed,
    }
}

impl RateTable {
    /// Only the first location is considered, even when a ZIP code spans several.
    pub fn ingest(envelope: &RateEnvelope) -> Result<RateTable, NoDataError> {
        let locations = envelope.locations();
        let first = locations.first().ok_or(NoDataError::NoRatesForLocation)?;

        let (shapes, rows): (Vec<_>, Vec<_>) = match first {
            RateLocation::Wrapped { rate } => rate.iter().map(entry_rows).unzip(),
            RateLocation::Row(_) => locations
                .iter()
                .filter_map(|location| match location {
                    RateLocation::Row(flat) => Some((RateShape::Flat, flat_rows(flat))),
                    _ => None,
                })
                .unzip(),
            RateLocation::Unrecognised(_) => (vec![RateShape::Unrecognised], vec![]),
        };

        Ok(RateTable {
            shape: combined_shape(&shapes),
            rows: rows.into_iter().flatten().collect(),
        })
    }

    pub fn shape(&self) -> RateShape {
        self.shape
    }

    pub fn rows(&self) -> &[MonthlyRate] {
        &self.rows
    }

    pub fn resolve(&self, month: Month) -> Result<ResolvedRate, NoDataError> {
        self.rows
            .iter()
            .find(|row| row.month == month)
            .map(ResolvedRate::from)
            .ok_or(NoDataError::NoRateForMonth(month))
    }
}

impl RateEnvelope {
    pub fn resolve(&self, month: Month) -> Result<ResolvedRate, NoDataError> {
        RateTable::ingest(self)?.resolve(month)
    }
}
