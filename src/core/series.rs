use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Observed `[min, max]` of a series along one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesExtent {
    pub min: f64,
    pub max: f64,
}

impl SeriesExtent {
    pub fn new(min: f64, max: f64) -> PlotResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(PlotError::Configuration(
                "series extent must be finite with min <= max".to_owned(),
            ));
        }
        Ok(Self { min, max })
    }

    /// Folds the finite values of `values` into an extent.
    ///
    /// Returns `None` for an empty sequence, which contributes nothing to a
    /// shared axis domain.
    pub fn from_values(values: &[f64]) -> PlotResult<Option<Self>> {
        if values.is_empty() {
            return Ok(None);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            if !value.is_finite() {
                return Err(PlotError::Configuration(
                    "series values must be finite".to_owned(),
                ));
            }
            min = min.min(*value);
            max = max.max(*value);
        }
        Ok(Some(Self { min, max }))
    }

    /// Componentwise union of two extents.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Logical axis ids a series maps its two dimensions onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub x_axis: String,
    pub y_axis: String,
}

impl AxisBinding {
    #[must_use]
    pub fn new(x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        Self {
            x_axis: x_axis.into(),
            y_axis: y_axis.into(),
        }
    }
}

/// Registered per-series state: label, axis binding and data extents.
///
/// Extents may be `None` when the series currently has no data; such a series
/// stays registered but contributes nothing to domain resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub id: String,
    pub label: String,
    pub binding: AxisBinding,
    pub x_extent: Option<SeriesExtent>,
    pub y_extent: Option<SeriesExtent>,
}

impl SeriesDescriptor {
    /// Builds a descriptor from raw sample arrays.
    ///
    /// The arrays must be equally long; a mismatch is a configuration error
    /// rather than a silently truncated series.
    pub fn from_data(
        id: impl Into<String>,
        label: impl Into<String>,
        binding: AxisBinding,
        xs: &[f64],
        ys: &[f64],
    ) -> PlotResult<Self> {
        if xs.len() != ys.len() {
            return Err(PlotError::Configuration(format!(
                "series data arrays must have equal length (x: {}, y: {})",
                xs.len(),
                ys.len()
            )));
        }

        Ok(Self {
            id: id.into(),
            label: label.into(),
            binding,
            x_extent: SeriesExtent::from_values(xs)?,
            y_extent: SeriesExtent::from_values(ys)?,
        })
    }
}

/// Converts a timestamp into the fractional unix seconds used by time scales.
#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}
