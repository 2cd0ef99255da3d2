use serde::{Deserialize, Serialize};

use crate::core::{AxisConfig, ScaleKind, SeriesDescriptor, SeriesExtent};
use crate::error::PlotResult;

/// Data dimension an axis maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisDimension {
    X,
    Y,
}

/// Finalized input range of a scale, derived fresh each cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Domain {
    Continuous { min: f64, max: f64 },
    Categorical { categories: Vec<String> },
}

impl Domain {
    /// Deterministic domain used when an axis has no bound data and no
    /// explicit override.
    pub const FALLBACK_MIN: f64 = 0.0;
    pub const FALLBACK_MAX: f64 = 1.0;
    /// No-data fallback for log axes, where zero is not a valid domain value.
    pub const LOG_FALLBACK_MIN: f64 = 1.0;
    pub const LOG_FALLBACK_MAX: f64 = 10.0;

    #[must_use]
    pub const fn fallback() -> Self {
        Self::Continuous {
            min: Self::FALLBACK_MIN,
            max: Self::FALLBACK_MAX,
        }
    }

    /// Scale-kind-aware no-data fallback.
    ///
    /// An axis with no bound data must still produce a buildable scale, so a
    /// log axis falls back to a strictly positive decade instead of `[0, 1]`.
    #[must_use]
    pub const fn fallback_for(kind: ScaleKind) -> Self {
        match kind {
            ScaleKind::Log => Self::Continuous {
                min: Self::LOG_FALLBACK_MIN,
                max: Self::LOG_FALLBACK_MAX,
            },
            _ => Self::fallback(),
        }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self {
            Self::Continuous { min, max } => min == max,
            Self::Categorical { categories } => categories.is_empty(),
        }
    }
}

/// Resolves the domain for one axis from the series currently bound to it.
///
/// Resolution order follows the override policy: an explicit axis domain wins
/// entirely and is never merged with data; otherwise matching series extents
/// are folded componentwise, falling back to a deterministic kind-aware
/// domain when no series contributes data. Padding is then applied in data
/// space, before any scale is constructed.
pub fn resolve_domain(
    axis: &AxisConfig,
    dimension: AxisDimension,
    series: &[SeriesDescriptor],
) -> PlotResult<Domain> {
    axis.validate()?;

    if axis.scale_kind == ScaleKind::Band {
        return Ok(Domain::Categorical {
            categories: axis.categories.clone(),
        });
    }

    if let Some((min, max)) = axis.explicit_domain {
        return Ok(Domain::Continuous { min, max });
    }

    let folded = series
        .iter()
        .filter(|descriptor| bound_axis_id(descriptor, dimension) == axis.id)
        .filter_map(|descriptor| bound_extent(descriptor, dimension))
        .fold(None::<SeriesExtent>, |accumulated, extent| {
            Some(match accumulated {
                Some(current) => current.merge(extent),
                None => extent,
            })
        });

    let Some(extent) = folded else {
        return Ok(Domain::fallback_for(axis.scale_kind));
    };

    let span = extent.max - extent.min;
    Ok(Domain::Continuous {
        min: extent.min - axis.padding_start.amount(span),
        max: extent.max + axis.padding_end.amount(span),
    })
}

fn bound_axis_id(descriptor: &SeriesDescriptor, dimension: AxisDimension) -> &str {
    match dimension {
        AxisDimension::X => &descriptor.binding.x_axis,
        AxisDimension::Y => &descriptor.binding.y_axis,
    }
}

fn bound_extent(descriptor: &SeriesDescriptor, dimension: AxisDimension) -> Option<SeriesExtent> {
    match dimension {
        AxisDimension::X => descriptor.x_extent,
        AxisDimension::Y => descriptor.y_extent,
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisDimension, Domain, resolve_domain};
    use crate::core::{AxisBinding, AxisConfig, AxisPosition, Padding, ScaleKind, SeriesDescriptor};

    fn series(id: &str, x_axis: &str, xs: &[f64], ys: &[f64]) -> SeriesDescriptor {
        SeriesDescriptor::from_data(id, id, AxisBinding::new(x_axis, "y"), xs, ys)
            .expect("valid descriptor")
    }

    #[test]
    fn merges_extents_across_bound_series() {
        let all = vec![
            series("a", "x", &[0.0, 10.0], &[0.0, 1.0]),
            series("b", "x", &[-5.0, 3.0], &[0.0, 1.0]),
            series("c", "other", &[100.0, 200.0], &[0.0, 1.0]),
        ];
        let axis = AxisConfig::new("x", AxisPosition::Bottom);
        let domain = resolve_domain(&axis, AxisDimension::X, &all).expect("resolve");
        assert_eq!(domain, Domain::Continuous { min: -5.0, max: 10.0 });
    }

    #[test]
    fn explicit_domain_wins_over_data() {
        let all = vec![series("a", "x", &[0.0, 10.0], &[0.0, 1.0])];
        let axis = AxisConfig::new("x", AxisPosition::Bottom).with_explicit_domain(-1.0, 1.0);
        let domain = resolve_domain(&axis, AxisDimension::X, &all).expect("resolve");
        assert_eq!(domain, Domain::Continuous { min: -1.0, max: 1.0 });
    }

    #[test]
    fn no_bound_series_falls_back() {
        let axis = AxisConfig::new("x", AxisPosition::Bottom);
        let domain = resolve_domain(&axis, AxisDimension::X, &[]).expect("resolve");
        assert_eq!(domain, Domain::fallback());
    }

    #[test]
    fn series_without_data_contributes_nothing() {
        let empty = series("a", "x", &[], &[]);
        let axis = AxisConfig::new("x", AxisPosition::Bottom);
        let domain = resolve_domain(&axis, AxisDimension::X, &[empty]).expect("resolve");
        assert_eq!(domain, Domain::fallback());
    }

    #[test]
    fn log_axis_without_data_falls_back_to_a_positive_domain() {
        let axis = AxisConfig::new("y", AxisPosition::Left).with_scale_kind(ScaleKind::Log);
        let domain = resolve_domain(&axis, AxisDimension::Y, &[]).expect("resolve");
        assert_eq!(domain, Domain::Continuous { min: 1.0, max: 10.0 });
    }

    #[test]
    fn padding_applies_in_data_space() {
        let all = vec![series("a", "x", &[0.0, 10.0], &[0.0, 1.0])];
        let axis = AxisConfig::new("x", AxisPosition::Bottom)
            .with_padding(Padding::Fraction(0.1), Padding::Absolute(2.0));
        let domain = resolve_domain(&axis, AxisDimension::X, &all).expect("resolve");
        assert_eq!(domain, Domain::Continuous { min: -1.0, max: 12.0 });
    }

    #[test]
    fn band_axis_uses_declared_categories() {
        let mut axis = AxisConfig::new("x", AxisPosition::Bottom).with_scale_kind(ScaleKind::Band);
        axis.categories = vec!["q1".to_owned(), "q2".to_owned()];
        let domain = resolve_domain(&axis, AxisDimension::X, &[]).expect("resolve");
        assert_eq!(
            domain,
            Domain::Categorical {
                categories: vec!["q1".to_owned(), "q2".to_owned()],
            }
        );
    }
}
