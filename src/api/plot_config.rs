use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_MAX_LAYOUT_PASSES, Margins};
use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Fixed ordered palette used when the host supplies no color scheme.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Public plot bootstrap configuration.
///
/// This type is serializable so host applications can persist/load plot setup
/// without inventing their own ad-hoc format. Outer width and height are
/// mandatory and positive; their absence is a fatal configuration error,
/// never a silent default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub margins: Margins,
    /// Ordered hex color strings; `None` selects [`DEFAULT_PALETTE`].
    #[serde(default)]
    pub color_scheme: Option<Vec<String>>,
    #[serde(default = "default_max_layout_passes")]
    pub max_layout_passes: usize,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
}

fn default_max_layout_passes() -> usize {
    DEFAULT_MAX_LAYOUT_PASSES
}

fn default_font_size_px() -> f64 {
    12.0
}

impl PlotConfig {
    pub fn new(width: u32, height: u32) -> PlotResult<Self> {
        let config = Self {
            width,
            height,
            margins: Margins::default(),
            color_scheme: None,
            max_layout_passes: default_max_layout_passes(),
            font_size_px: default_font_size_px(),
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_color_scheme(mut self, colors: Vec<String>) -> Self {
        self.color_scheme = Some(colors);
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::Configuration(format!(
                "outer canvas size must be positive (got {}x{})",
                self.width, self.height
            )));
        }
        self.margins.validate()?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(PlotError::Configuration(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        if self.max_layout_passes == 0 {
            return Err(PlotError::Configuration(
                "max layout passes must be >= 1".to_owned(),
            ));
        }
        if let Some(colors) = &self.color_scheme {
            if colors.is_empty() {
                return Err(PlotError::Configuration(
                    "color scheme must not be empty".to_owned(),
                ));
            }
            for color in colors {
                Color::from_hex(color)?;
            }
        }
        Ok(())
    }

    /// Resolved ordered palette.
    pub fn palette(&self) -> PlotResult<Vec<Color>> {
        match &self.color_scheme {
            Some(colors) => colors.iter().map(|hex| Color::from_hex(hex)).collect(),
            None => DEFAULT_PALETTE
                .iter()
                .map(|hex| Color::from_hex(hex))
                .collect(),
        }
    }
}
