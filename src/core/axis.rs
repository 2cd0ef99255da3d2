use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Canvas edge an axis is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisPosition {
    Top,
    Right,
    Bottom,
    Left,
}

impl AxisPosition {
    /// Whether the axis maps the horizontal plot dimension.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Mapping family used by an axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScaleKind {
    /// Uniform spacing in raw data units.
    #[default]
    Linear,
    /// Linear over fractional unix-second timestamps.
    Time,
    /// Uniform spacing in natural-log units (all domain values must be > 0).
    Log,
    /// Discrete bands, one per category, in declared category order.
    Band,
}

/// Domain padding applied on one side, in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Padding {
    #[default]
    None,
    /// Added directly in data units.
    Absolute(f64),
    /// Fraction of the unpadded domain span.
    Fraction(f64),
}

impl Padding {
    pub fn validate(self) -> PlotResult<Self> {
        let value = match self {
            Self::None => return Ok(self),
            Self::Absolute(value) | Self::Fraction(value) => value,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(PlotError::Configuration(
                "axis padding must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Data-space amount this padding adds given the unpadded span.
    #[must_use]
    pub fn amount(self, span: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Absolute(value) => value,
            Self::Fraction(fraction) => span * fraction,
        }
    }
}

/// Per-cycle axis configuration, rebuilt from declarations every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub id: String,
    pub position: AxisPosition,
    #[serde(default)]
    pub scale_kind: ScaleKind,
    #[serde(default)]
    pub padding_start: Padding,
    #[serde(default)]
    pub padding_end: Padding,
    /// Explicit domain override; when present it wins over all series data.
    #[serde(default)]
    pub explicit_domain: Option<(f64, f64)>,
    /// Declared category order for band axes.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub show_primary_grid_lines: bool,
}

impl AxisConfig {
    #[must_use]
    pub fn new(id: impl Into<String>, position: AxisPosition) -> Self {
        Self {
            id: id.into(),
            position,
            scale_kind: ScaleKind::default(),
            padding_start: Padding::None,
            padding_end: Padding::None,
            explicit_domain: None,
            categories: Vec::new(),
            label: None,
            show_primary_grid_lines: false,
        }
    }

    #[must_use]
    pub fn with_scale_kind(mut self, scale_kind: ScaleKind) -> Self {
        self.scale_kind = scale_kind;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding_start: Padding, padding_end: Padding) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    #[must_use]
    pub fn with_explicit_domain(mut self, min: f64, max: f64) -> Self {
        self.explicit_domain = Some((min, max));
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        self.padding_start.validate()?;
        self.padding_end.validate()?;
        if let Some((min, max)) = self.explicit_domain {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(PlotError::Configuration(
                    "explicit axis domain must be finite with min <= max".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisConfig, AxisPosition, Padding};

    #[test]
    fn padding_amount_for_each_variant() {
        assert_eq!(Padding::None.amount(10.0), 0.0);
        assert_eq!(Padding::Absolute(2.5).amount(10.0), 2.5);
        assert_eq!(Padding::Fraction(0.1).amount(10.0), 1.0);
    }

    #[test]
    fn negative_padding_is_rejected() {
        assert!(Padding::Absolute(-1.0).validate().is_err());
        assert!(Padding::Fraction(f64::NAN).validate().is_err());
    }

    #[test]
    fn explicit_domain_must_be_ordered() {
        let axis = AxisConfig::new("x", AxisPosition::Bottom).with_explicit_domain(5.0, 1.0);
        assert!(axis.validate().is_err());
    }
}
