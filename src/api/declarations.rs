use serde::{Deserialize, Serialize};

use crate::api::PlotConfig;
use crate::core::{
    AxisBinding, AxisConfig, CoordSpec, HeadingPosition, LegendEdge, LegendLayout,
    SeriesDescriptor,
};
use crate::error::{PlotError, PlotResult};
use crate::render::LineStyle;

/// Declared line series: raw samples plus axis bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDecl {
    pub id: String,
    pub label: String,
    pub x_axis: String,
    pub y_axis: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub style: LineStyle,
}

impl SeriesDecl {
    /// Extent descriptor this declaration registers.
    pub fn descriptor(&self) -> PlotResult<SeriesDescriptor> {
        SeriesDescriptor::from_data(
            self.id.clone(),
            self.label.clone(),
            AxisBinding::new(self.x_axis.clone(), self.y_axis.clone()),
            &self.x,
            &self.y,
        )
    }
}

/// Declared plot heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingDecl {
    pub text: String,
    #[serde(default)]
    pub position: HeadingPosition,
}

/// Declared legend placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendDecl {
    pub edge: LegendEdge,
    #[serde(default)]
    pub inside: bool,
    #[serde(default = "default_legend_margin")]
    pub margin: f64,
}

fn default_legend_margin() -> f64 {
    8.0
}

impl LegendDecl {
    #[must_use]
    pub fn layout(self) -> LegendLayout {
        LegendLayout {
            edge: self.edge,
            inside: self.inside,
            margin: self.margin,
        }
    }
}

/// Annotation shape with mixed-system coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationShape {
    Point {
        x: CoordSpec,
        y: CoordSpec,
    },
    Ellipse {
        cx: CoordSpec,
        cy: CoordSpec,
        rx: CoordSpec,
        ry: CoordSpec,
    },
}

/// Declared annotation, optionally pinned to specific axes.
///
/// When an axis id is omitted the annotation uses the first declared axis of
/// the matching orientation for data-space coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDecl {
    #[serde(default)]
    pub x_axis: Option<String>,
    #[serde(default)]
    pub y_axis: Option<String>,
    pub shape: AnnotationShape,
}

/// One declared plot child, tagged by structural role.
///
/// Role is carried by the variant, never inferred from position in the list,
/// so partitioning is order-independent by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotChild {
    Series(SeriesDecl),
    Axis(AxisConfig),
    Heading(HeadingDecl),
    Legend(LegendDecl),
    Annotation(AnnotationDecl),
}

pub const PLOT_DECLARATION_JSON_SCHEMA_V1: u32 = 1;

/// Versioned JSON payload for a full plot declaration.
///
/// Hosts persist/load complete plot setups through this contract instead of
/// an ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotDeclarationJsonContractV1 {
    pub schema_version: u32,
    pub config: PlotConfig,
    pub children: Vec<PlotChild>,
}

impl PlotDeclarationJsonContractV1 {
    #[must_use]
    pub fn new(config: PlotConfig, children: Vec<PlotChild>) -> Self {
        Self {
            schema_version: PLOT_DECLARATION_JSON_SCHEMA_V1,
            config,
            children,
        }
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PlotError::Configuration(format!("failed to serialize plot declaration: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        let payload: Self = serde_json::from_str(input).map_err(|e| {
            PlotError::Configuration(format!("failed to parse plot declaration json: {e}"))
        })?;
        if payload.schema_version != PLOT_DECLARATION_JSON_SCHEMA_V1 {
            return Err(PlotError::Configuration(format!(
                "unsupported plot declaration schema version: {}",
                payload.schema_version
            )));
        }
        payload.config.validate()?;
        Ok(payload)
    }
}
