use serde::{Deserialize, Serialize};

use crate::core::{PlotGeometry, Scale};
use crate::error::{PlotError, PlotResult};

/// One declared annotation coordinate, before interpretation.
///
/// A bare number is a final pixel offset; strings are interpreted at
/// resolution time (`"50%"` is a plot-fraction, `"3.5"` a data value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordSpec {
    Pixel(f64),
    Text(String),
}

impl CoordSpec {
    #[must_use]
    pub fn pixel(value: f64) -> Self {
        Self::Pixel(value)
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Interpreted coordinate, ready for pixel resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    /// Already a final pixel offset within the plot area.
    Pixel(f64),
    /// Percentage of the relevant plot dimension, from the plot origin.
    Percent(f64),
    /// Data-space value, resolved through the bound axis scale.
    Data(f64),
}

impl Coord {
    /// Disambiguates a declared coordinate.
    ///
    /// Percent-suffixed strings are matched first by pattern; any other
    /// string must parse as a number and is treated as a data value.
    pub fn parse(spec: &CoordSpec) -> PlotResult<Self> {
        match spec {
            CoordSpec::Pixel(value) => {
                if !value.is_finite() {
                    return Err(PlotError::Configuration(
                        "pixel coordinate must be finite".to_owned(),
                    ));
                }
                Ok(Self::Pixel(*value))
            }
            CoordSpec::Text(text) => {
                let trimmed = text.trim();
                if let Some(percent_text) = trimmed.strip_suffix('%') {
                    let percent: f64 = percent_text.trim().parse().map_err(|_| {
                        PlotError::Configuration(format!(
                            "invalid percentage coordinate `{text}`"
                        ))
                    })?;
                    if !percent.is_finite() {
                        return Err(PlotError::Configuration(
                            "percentage coordinate must be finite".to_owned(),
                        ));
                    }
                    return Ok(Self::Percent(percent));
                }
                let value: f64 = trimmed.parse().map_err(|_| {
                    PlotError::Configuration(format!("invalid data coordinate `{text}`"))
                })?;
                if !value.is_finite() {
                    return Err(PlotError::Configuration(
                        "data coordinate must be finite".to_owned(),
                    ));
                }
                Ok(Self::Data(value))
            }
        }
    }
}

/// Resolved point annotation in plot-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPx {
    pub x: f64,
    pub y: f64,
}

/// Resolved ellipse annotation in plot-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipsePx {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

/// The one coordinate resolver shared by every annotation shape.
///
/// Mixed coordinate systems (pixel, percentage, data value) must behave
/// identically across shapes, so all of them resolve through this type.
/// Output is plot-local: the plot origin is `(0, 0)`.
#[derive(Debug, Clone, Copy)]
pub struct PositionResolver<'a> {
    geometry: &'a PlotGeometry,
    x_scale: Option<&'a Scale>,
    y_scale: Option<&'a Scale>,
}

#[derive(Debug, Clone, Copy)]
enum PlotDimension {
    Horizontal,
    Vertical,
}

impl<'a> PositionResolver<'a> {
    #[must_use]
    pub fn new(
        geometry: &'a PlotGeometry,
        x_scale: Option<&'a Scale>,
        y_scale: Option<&'a Scale>,
    ) -> Self {
        Self {
            geometry,
            x_scale,
            y_scale,
        }
    }

    pub fn resolve_point(&self, x: &CoordSpec, y: &CoordSpec) -> PlotResult<PointPx> {
        Ok(PointPx {
            x: self.resolve_position(x, PlotDimension::Horizontal)?,
            y: self.resolve_position(y, PlotDimension::Vertical)?,
        })
    }

    pub fn resolve_ellipse(
        &self,
        cx: &CoordSpec,
        cy: &CoordSpec,
        rx: &CoordSpec,
        ry: &CoordSpec,
    ) -> PlotResult<EllipsePx> {
        Ok(EllipsePx {
            cx: self.resolve_position(cx, PlotDimension::Horizontal)?,
            cy: self.resolve_position(cy, PlotDimension::Vertical)?,
            rx: self.resolve_radius(rx, PlotDimension::Horizontal)?,
            ry: self.resolve_radius(ry, PlotDimension::Vertical)?,
        })
    }

    fn resolve_position(&self, spec: &CoordSpec, dimension: PlotDimension) -> PlotResult<f64> {
        match Coord::parse(spec)? {
            Coord::Pixel(value) => Ok(value),
            Coord::Percent(percent) => Ok(percent / 100.0 * self.plot_extent(dimension)),
            Coord::Data(value) => self.scale_for(dimension)?.position(value),
        }
    }

    /// Radii use the same interpretation as positions; a data-space radius is
    /// the pixel distance between the value and the scale's range start.
    fn resolve_radius(&self, spec: &CoordSpec, dimension: PlotDimension) -> PlotResult<f64> {
        match Coord::parse(spec)? {
            Coord::Pixel(value) => Ok(value.abs()),
            Coord::Percent(percent) => Ok((percent / 100.0 * self.plot_extent(dimension)).abs()),
            Coord::Data(value) => {
                let scale = self.scale_for(dimension)?;
                Ok((scale.position(value)? - scale.range().start).abs())
            }
        }
    }

    fn plot_extent(&self, dimension: PlotDimension) -> f64 {
        match dimension {
            PlotDimension::Horizontal => self.geometry.plot_width,
            PlotDimension::Vertical => self.geometry.plot_height,
        }
    }

    fn scale_for(&self, dimension: PlotDimension) -> PlotResult<&Scale> {
        let (scale, name) = match dimension {
            PlotDimension::Horizontal => (self.x_scale, "x"),
            PlotDimension::Vertical => (self.y_scale, "y"),
        };
        scale.ok_or_else(|| {
            PlotError::Configuration(format!(
                "data coordinate requires a bound {name} axis scale"
            ))
        })
    }
}
