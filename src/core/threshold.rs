//! Ordered cut-point tables that map a computed number to a label.
//!
//! Bands are lower-inclusive: a value sitting exactly on a cut point
//! belongs to the band that starts there. The first band must start at
//! negative infinity so that every real value has a home.

use super::error::ValidationError;
use super::types::Classification;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub label: &'static str,
    pub advice: &'static str,
}

pub(crate) const fn band(lower: f64, label: &'static str, advice: &'static str) -> Band {
    Band {
        lower,
        label,
        advice,
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("table {0} has no bands")]
    Empty(&'static str),

    #[error("table {0} does not start at negative infinity")]
    OpenLowerEnd(&'static str),

    #[error("table {table} band {index} has a NaN cut point")]
    NotANumber { table: &'static str, index: usize },

    #[error("table {table} band {index} does not increase over its predecessor")]
    NotIncreasing { table: &'static str, index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    pub name: &'static str,
    pub bands: &'static [Band],
}

impl ThresholdTable {
    pub const fn new(name: &'static str, bands: &'static [Band]) -> Self {
        Self { name, bands }
    }

    /// Returns `None` only for NaN.
    pub fn classify(&self, value: f64) -> Option<&'static Band> {
        let bands: &'static [Band] = self.bands;
        let idx = bands.partition_point(|b| b.lower <= value);
        idx.checked_sub(1).and_then(move |i| bands.get(i))
    }

    pub fn classification(&self, value: f64) -> Result<Classification, ValidationError> {
        let band = self
            .classify(value)
            .ok_or_else(|| ValidationError::NonFiniteResult {
                output: self.name.to_string(),
            })?;
        Ok(Classification {
            table: self.name,
            label: band.label,
            advice: band.advice,
        })
    }

    pub fn check(&self) -> Result<(), TableError> {
        let Some(first) = self.bands.first() else {
            return Err(TableError::Empty(self.name));
        };
        if first.lower != f64::NEG_INFINITY {
            return Err(TableError::OpenLowerEnd(self.name));
        }
        for (index, pair) in self.bands.windows(2).enumerate() {
            if pair[1].lower.is_nan() {
                return Err(TableError::NotANumber {
                    table: self.name,
                    index: index + 1,
                });
            }
            if pair[1].lower <= pair[0].lower {
                return Err(TableError::NotIncreasing {
                    table: self.name,
                    index: index + 1,
                });
            }
        }
        Ok(())
    }
}
