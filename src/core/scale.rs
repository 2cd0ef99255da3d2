use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{Domain, ScaleKind, datetime_to_unix_seconds};
use crate::error::{PlotError, PlotResult};

/// Output pixel interval of a scale.
///
/// `start` maps the domain minimum and `end` the domain maximum, so an
/// inverted y axis is expressed as `start > end` rather than a special case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: f64,
    pub end: f64,
}

impl PixelRange {
    pub fn new(start: f64, end: f64) -> PlotResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(PlotError::Configuration(
                "pixel range must be finite".to_owned(),
            ));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.start + self.end) / 2.0
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }
}

/// Band anchor returned for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BandAlignment {
    Start,
    #[default]
    Center,
}

/// A built forward mapping from data space to pixel space.
///
/// Construction via [`Scale::build`] performs all domain validation, so a
/// `Scale` value always maps without further failure modes beyond non-finite
/// or unknown inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    Linear {
        domain_min: f64,
        domain_max: f64,
        range: PixelRange,
    },
    Log {
        ln_min: f64,
        ln_max: f64,
        range: PixelRange,
    },
    Band {
        categories: Vec<String>,
        range: PixelRange,
        alignment: BandAlignment,
    },
}

impl Scale {
    /// Builds the mapping function for one axis.
    ///
    /// Log domains containing values <= 0 fail here, before any mapping
    /// exists. Building twice from equal inputs produces observably
    /// equivalent scales, which is what makes [`ScaleCache`] sound.
    pub fn build(
        domain: &Domain,
        range: PixelRange,
        kind: ScaleKind,
        alignment: BandAlignment,
    ) -> PlotResult<Self> {
        match (kind, domain) {
            (ScaleKind::Linear | ScaleKind::Time, Domain::Continuous { min, max }) => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(PlotError::Domain(
                        "continuous domain must be finite".to_owned(),
                    ));
                }
                Ok(Self::Linear {
                    domain_min: *min,
                    domain_max: *max,
                    range,
                })
            }
            (ScaleKind::Log, Domain::Continuous { min, max }) => {
                if !min.is_finite() || !max.is_finite() {
                    return Err(PlotError::Domain(
                        "continuous domain must be finite".to_owned(),
                    ));
                }
                if *min <= 0.0 || *max <= 0.0 {
                    return Err(PlotError::Domain(
                        "log scale requires domain values > 0".to_owned(),
                    ));
                }
                Ok(Self::Log {
                    ln_min: min.ln(),
                    ln_max: max.ln(),
                    range,
                })
            }
            (ScaleKind::Band, Domain::Categorical { categories }) => {
                if categories.is_empty() {
                    return Err(PlotError::Domain(
                        "band scale requires at least one category".to_owned(),
                    ));
                }
                Ok(Self::Band {
                    categories: categories.clone(),
                    range,
                    alignment,
                })
            }
            (ScaleKind::Band, Domain::Continuous { .. }) => Err(PlotError::Domain(
                "band scale requires a categorical domain".to_owned(),
            )),
            (_, Domain::Categorical { .. }) => Err(PlotError::Domain(
                "continuous scale requires a continuous domain".to_owned(),
            )),
        }
    }

    /// Maps a data value to its pixel position.
    ///
    /// A degenerate domain (`min == max`) maps every value to the pixel-range
    /// midpoint instead of dividing by zero.
    pub fn position(&self, value: f64) -> PlotResult<f64> {
        if !value.is_finite() {
            return Err(PlotError::Domain("value must be finite".to_owned()));
        }

        match self {
            Self::Linear {
                domain_min,
                domain_max,
                range,
            } => Ok(interpolate(*domain_min, *domain_max, value, *range)),
            Self::Log { ln_min, ln_max, range } => {
                if value <= 0.0 {
                    return Err(PlotError::Domain(
                        "log scale requires values > 0".to_owned(),
                    ));
                }
                Ok(interpolate(*ln_min, *ln_max, value.ln(), *range))
            }
            Self::Band { .. } => Err(PlotError::Domain(
                "band scale maps categories, not numbers".to_owned(),
            )),
        }
    }

    /// Maps a timestamp through a time-kind scale.
    pub fn position_time(&self, time: DateTime<Utc>) -> PlotResult<f64> {
        self.position(datetime_to_unix_seconds(time))
    }

    /// Maps a category to its band anchor.
    pub fn category_position(&self, category: &str) -> PlotResult<f64> {
        let Self::Band {
            categories,
            range,
            alignment,
        } = self
        else {
            return Err(PlotError::Domain(
                "continuous scale maps numbers, not categories".to_owned(),
            ));
        };

        let Some(index) = categories.iter().position(|known| known == category) else {
            return Err(PlotError::Domain(format!(
                "unknown band category `{category}`"
            )));
        };

        let band = range.span() / categories.len() as f64;
        let start = range.start + band * index as f64;
        Ok(match alignment {
            BandAlignment::Start => start,
            BandAlignment::Center => start + band / 2.0,
        })
    }

    /// Width of one band, or `None` for continuous scales.
    #[must_use]
    pub fn band_width(&self) -> Option<f64> {
        match self {
            Self::Band { categories, range, .. } => {
                Some((range.span() / categories.len() as f64).abs())
            }
            _ => None,
        }
    }

    /// Pixel positions of evenly spaced primary ticks.
    ///
    /// Continuous scales space ticks uniformly in their transformed domain
    /// (raw units for linear/time, ln units for log), which is uniform pixel
    /// spacing either way. Band scales tick at every category anchor.
    #[must_use]
    pub fn tick_positions(&self, tick_count: usize) -> Vec<f64> {
        match self {
            Self::Linear { range, .. } | Self::Log { range, .. } => {
                if tick_count == 0 {
                    return Vec::new();
                }
                if tick_count == 1 {
                    return vec![range.midpoint()];
                }
                let denominator = (tick_count - 1) as f64;
                (0..tick_count)
                    .map(|index| {
                        let t = index as f64 / denominator;
                        (1.0 - t) * range.start + t * range.end
                    })
                    .collect()
            }
            Self::Band { categories, .. } => categories
                .iter()
                .filter_map(|category| self.category_position(category).ok())
                .collect(),
        }
    }

    #[must_use]
    pub fn range(&self) -> PixelRange {
        match self {
            Self::Linear { range, .. } | Self::Log { range, .. } | Self::Band { range, .. } => {
                *range
            }
        }
    }
}

fn interpolate(domain_min: f64, domain_max: f64, value: f64, range: PixelRange) -> f64 {
    let span = domain_max - domain_min;
    if span == 0.0 {
        return range.midpoint();
    }
    // Affine form chosen so domain endpoints hit the range endpoints exactly.
    let t = (value - domain_min) / span;
    (1.0 - t) * range.start + t * range.end
}

/// Hashable identity of a built scale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DomainKey {
    Continuous(OrderedFloat<f64>, OrderedFloat<f64>),
    Categorical(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScaleKey {
    domain: DomainKey,
    start: OrderedFloat<f64>,
    end: OrderedFloat<f64>,
    kind: ScaleKind,
    alignment: BandAlignment,
}

impl ScaleKey {
    fn new(domain: &Domain, range: PixelRange, kind: ScaleKind, alignment: BandAlignment) -> Self {
        let domain = match domain {
            Domain::Continuous { min, max } => {
                DomainKey::Continuous(OrderedFloat(*min), OrderedFloat(*max))
            }
            Domain::Categorical { categories } => DomainKey::Categorical(categories.clone()),
        };
        Self {
            domain,
            start: OrderedFloat(range.start),
            end: OrderedFloat(range.end),
            kind,
            alignment,
        }
    }
}

/// Memoized scale construction keyed on `(domain, pixel range, kind, alignment)`.
///
/// Because [`Scale::build`] is idempotent, a cache hit is observably
/// equivalent to a fresh build.
#[derive(Debug, Default)]
pub struct ScaleCache {
    entries: IndexMap<ScaleKey, Scale>,
}

impl ScaleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        domain: &Domain,
        range: PixelRange,
        kind: ScaleKind,
        alignment: BandAlignment,
    ) -> PlotResult<&Scale> {
        let key = ScaleKey::new(domain, range, kind, alignment);
        if !self.entries.contains_key(&key) {
            let scale = Scale::build(domain, range, kind, alignment)?;
            self.entries.insert(key.clone(), scale);
        }
        Ok(&self.entries[&key])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
