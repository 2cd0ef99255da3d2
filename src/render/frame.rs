use serde::{Deserialize, Serialize};

use crate::core::PlotGeometry;
use crate::error::PlotResult;
use crate::render::{EllipsePrimitive, MarkerPrimitive, PolylinePrimitive, TextPrimitive};

/// Backend-agnostic scene for one plot draw pass.
///
/// Every primitive carries final canvas pixel coordinates; this is the whole
/// contract toward rendering backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub outer_width: u32,
    pub outer_height: u32,
    pub geometry: PlotGeometry,
    pub polylines: Vec<PolylinePrimitive>,
    pub markers: Vec<MarkerPrimitive>,
    pub ellipses: Vec<EllipsePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(outer_width: u32, outer_height: u32, geometry: PlotGeometry) -> Self {
        Self {
            outer_width,
            outer_height,
            geometry,
            polylines: Vec::new(),
            markers: Vec::new(),
            ellipses: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn validate(&self) -> PlotResult<()> {
        for polyline in &self.polylines {
            polyline.validate()?;
        }
        for marker in &self.markers {
            marker.validate()?;
        }
        for ellipse in &self.ellipses {
            ellipse.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }
}
