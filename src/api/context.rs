use indexmap::IndexMap;

use crate::core::{PlotGeometry, Scale};
use crate::render::Color;

/// Read-only per-cycle coordinate context shared with all descendants.
///
/// Built once per render cycle by the orchestrator and handed out by
/// reference; descendants read scales, geometry and color assignment but
/// never mutate plot state through it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateContext {
    pub geometry: PlotGeometry,
    x_scales: IndexMap<String, Scale>,
    y_scales: IndexMap<String, Scale>,
    series_colors: IndexMap<String, Color>,
}

impl CoordinateContext {
    #[must_use]
    pub(crate) fn new(
        geometry: PlotGeometry,
        x_scales: IndexMap<String, Scale>,
        y_scales: IndexMap<String, Scale>,
        series_colors: IndexMap<String, Color>,
    ) -> Self {
        Self {
            geometry,
            x_scales,
            y_scales,
            series_colors,
        }
    }

    /// Scale for a horizontal (top/bottom) axis id.
    #[must_use]
    pub fn x_scale(&self, axis_id: &str) -> Option<&Scale> {
        self.x_scales.get(axis_id)
    }

    /// Scale for a vertical (left/right) axis id.
    #[must_use]
    pub fn y_scale(&self, axis_id: &str) -> Option<&Scale> {
        self.y_scales.get(axis_id)
    }

    /// First declared horizontal axis scale, if any.
    #[must_use]
    pub fn first_x_scale(&self) -> Option<&Scale> {
        self.x_scales.values().next()
    }

    /// First declared vertical axis scale, if any.
    #[must_use]
    pub fn first_y_scale(&self) -> Option<&Scale> {
        self.y_scales.values().next()
    }

    /// Stable palette color assigned to a series id.
    #[must_use]
    pub fn series_color(&self, series_id: &str) -> Option<Color> {
        self.series_colors.get(series_id).copied()
    }

    #[must_use]
    pub fn x_axis_ids(&self) -> Vec<&str> {
        self.x_scales.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn y_axis_ids(&self) -> Vec<&str> {
        self.y_scales.keys().map(String::as_str).collect()
    }
}
