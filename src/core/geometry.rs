use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{ChromeMeasurements, ChromeMeasurer};
use crate::error::{PlotError, PlotResult};

/// Outer canvas margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn validate(self) -> PlotResult<Self> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::Configuration(format!(
                    "margin `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Edge the heading is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HeadingPosition {
    #[default]
    Top,
    Bottom,
}

/// Edge the legend is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendEdge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Legend placement relative to the plot rectangle.
///
/// An outside legend reserves canvas space on its edge; an inside legend is
/// overlaid on the plot area and reserves nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub edge: LegendEdge,
    pub inside: bool,
    pub margin: f64,
}

impl LegendLayout {
    #[must_use]
    pub const fn outside(edge: LegendEdge, margin: f64) -> Self {
        Self {
            edge,
            inside: false,
            margin,
        }
    }

    #[must_use]
    pub const fn inside(edge: LegendEdge, margin: f64) -> Self {
        Self {
            edge,
            inside: true,
            margin,
        }
    }

    fn occupies_horizontal(self) -> bool {
        !self.inside && matches!(self.edge, LegendEdge::Left | LegendEdge::Right)
    }

    fn occupies_vertical(self) -> bool {
        !self.inside && matches!(self.edge, LegendEdge::Top | LegendEdge::Bottom)
    }
}

/// Inner plot rectangle and chrome offsets for one cycle.
///
/// Recomputed every cycle, never patched. `degraded` marks geometry where a
/// plot dimension was clamped to zero because chrome outgrew the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotGeometry {
    pub plot_width: f64,
    pub plot_height: f64,
    pub left_offset: f64,
    pub top_offset: f64,
    pub legend_x: f64,
    pub legend_y: f64,
    pub degraded: bool,
}

/// Everything viewport sizing consumes for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryInputs {
    pub outer_width: u32,
    pub outer_height: u32,
    pub margins: Margins,
    pub heading_position: HeadingPosition,
    pub legend: Option<LegendLayout>,
    pub measurements: ChromeMeasurements,
}

impl GeometryInputs {
    pub fn new(outer_width: u32, outer_height: u32) -> PlotResult<Self> {
        if outer_width == 0 || outer_height == 0 {
            return Err(PlotError::Configuration(format!(
                "outer canvas size must be positive (got {outer_width}x{outer_height})"
            )));
        }
        Ok(Self {
            outer_width,
            outer_height,
            margins: Margins::default(),
            heading_position: HeadingPosition::default(),
            legend: None,
            measurements: ChromeMeasurements::default(),
        })
    }
}

/// Computes the plot rectangle from fixed outer size and measured chrome.
///
/// Chrome larger than the canvas clamps the affected plot dimension to zero;
/// that is degraded-but-renderable, not an error.
#[must_use]
pub fn compute_geometry(inputs: &GeometryInputs) -> PlotGeometry {
    let measured = &inputs.measurements;
    let margins = inputs.margins;
    let outer_width = f64::from(inputs.outer_width);
    let outer_height = f64::from(inputs.outer_height);

    let legend_horizontal = inputs
        .legend
        .filter(|legend| legend.occupies_horizontal())
        .map_or(0.0, |legend| measured.legend.width + legend.margin);
    let legend_vertical = inputs
        .legend
        .filter(|legend| legend.occupies_vertical())
        .map_or(0.0, |legend| measured.legend.height + legend.margin);

    let raw_width = outer_width
        - margins.left
        - margins.right
        - measured.left_axis.width
        - measured.right_axis.width
        - legend_horizontal;
    let raw_height = outer_height
        - margins.top
        - margins.bottom
        - measured.top_axis.height
        - measured.bottom_axis.height
        - measured.heading.height
        - legend_vertical;

    let degraded = raw_width < 0.0 || raw_height < 0.0;
    if degraded {
        warn!(
            raw_width,
            raw_height, "chrome exceeds canvas, clamping plot area to zero"
        );
    }
    let plot_width = raw_width.max(0.0);
    let plot_height = raw_height.max(0.0);

    let heading_top = match inputs.heading_position {
        HeadingPosition::Top => measured.heading.height,
        HeadingPosition::Bottom => 0.0,
    };
    let legend_left = inputs
        .legend
        .filter(|legend| !legend.inside && legend.edge == LegendEdge::Left)
        .map_or(0.0, |legend| measured.legend.width + legend.margin);
    let legend_top = inputs
        .legend
        .filter(|legend| !legend.inside && legend.edge == LegendEdge::Top)
        .map_or(0.0, |legend| measured.legend.height + legend.margin);

    let left_offset = margins.left + measured.left_axis.width + legend_left;
    let top_offset = margins.top + heading_top + measured.top_axis.height + legend_top;

    let (legend_x, legend_y) = inputs.legend.map_or((0.0, 0.0), |legend| {
        resolve_legend_origin(
            legend,
            measured,
            margins,
            heading_top,
            left_offset,
            top_offset,
            plot_width,
            plot_height,
        )
    });

    PlotGeometry {
        plot_width,
        plot_height,
        left_offset,
        top_offset,
        legend_x,
        legend_y,
        degraded,
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_legend_origin(
    legend: LegendLayout,
    measured: &ChromeMeasurements,
    margins: Margins,
    heading_top: f64,
    left_offset: f64,
    top_offset: f64,
    plot_width: f64,
    plot_height: f64,
) -> (f64, f64) {
    if legend.inside {
        return match legend.edge {
            LegendEdge::Left | LegendEdge::Top => {
                (left_offset + legend.margin, top_offset + legend.margin)
            }
            LegendEdge::Right => (
                left_offset + plot_width - measured.legend.width - legend.margin,
                top_offset + legend.margin,
            ),
            LegendEdge::Bottom => (
                left_offset + legend.margin,
                top_offset + plot_height - measured.legend.height - legend.margin,
            ),
        };
    }

    match legend.edge {
        LegendEdge::Right => (
            left_offset + plot_width + measured.right_axis.width + legend.margin,
            top_offset,
        ),
        LegendEdge::Left => (margins.left, top_offset),
        LegendEdge::Top => (left_offset, margins.top + heading_top),
        LegendEdge::Bottom => (
            left_offset,
            top_offset + plot_height + measured.bottom_axis.height + legend.margin,
        ),
    }
}

/// Default bound for the measurement fixed-point loop.
pub const DEFAULT_MAX_LAYOUT_PASSES: usize = 8;

/// Result of the measurement reconciliation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergedLayout {
    pub geometry: PlotGeometry,
    pub measurements: ChromeMeasurements,
    pub passes: usize,
    pub converged: bool,
}

/// Runs the geometry/measurement feedback loop to a fixed point.
///
/// Chrome sizes depend on rendered content while content position depends on
/// the resulting plot rectangle, so a single pass cannot be exact. Each pass
/// computes geometry from the current measurements and re-measures; the loop
/// stops when measurements stop changing, when a previously seen measurement
/// set recurs (oscillation), or after `max_passes`.
pub fn converge_geometry(
    inputs: &GeometryInputs,
    measurer: &dyn ChromeMeasurer,
    max_passes: usize,
) -> ConvergedLayout {
    let mut measurements = inputs.measurements;
    let mut history: SmallVec<[ChromeMeasurements; DEFAULT_MAX_LAYOUT_PASSES]> = SmallVec::new();
    let mut passes = 0;
    let max_passes = max_passes.max(1);

    loop {
        let pass_inputs = GeometryInputs {
            measurements,
            ..*inputs
        };
        let geometry = compute_geometry(&pass_inputs);
        passes += 1;

        let mut remeasured = ChromeMeasurements::default();
        for element in ChromeMeasurements::ALL_ELEMENTS {
            remeasured.set(element, measurer.measure(element, &geometry));
        }

        if remeasured == measurements {
            debug!(passes, "layout converged");
            return ConvergedLayout {
                geometry,
                measurements,
                passes,
                converged: true,
            };
        }

        let oscillating = history.contains(&remeasured);
        if oscillating || passes >= max_passes {
            if oscillating {
                warn!(passes, "layout measurements oscillate, keeping last geometry");
            } else {
                warn!(max_passes, "layout did not converge within pass budget");
            }
            return ConvergedLayout {
                geometry,
                measurements: remeasured,
                passes,
                converged: false,
            };
        }

        history.push(measurements);
        measurements = remeasured;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_MAX_LAYOUT_PASSES, GeometryInputs, HeadingPosition, LegendEdge, LegendLayout,
        Margins, compute_geometry, converge_geometry,
    };
    use crate::core::{
        AxisPosition, ChromeElement, ChromeMeasurements, FixedMeasurer, Measured, ZeroMeasurer,
    };

    #[test]
    fn zero_chrome_fills_canvas() {
        let inputs = GeometryInputs::new(500, 300).expect("valid size");
        let geometry = compute_geometry(&inputs);
        assert_eq!(geometry.plot_width, 500.0);
        assert_eq!(geometry.plot_height, 300.0);
        assert_eq!(geometry.left_offset, 0.0);
        assert_eq!(geometry.top_offset, 0.0);
        assert!(!geometry.degraded);
    }

    #[test]
    fn chrome_and_margins_subtract_from_plot_area() {
        let mut inputs = GeometryInputs::new(800, 600).expect("valid size");
        inputs.margins = Margins {
            top: 10.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        };
        inputs.measurements.left_axis = Measured::new(50.0, 0.0);
        inputs.measurements.bottom_axis = Measured::new(0.0, 25.0);
        inputs.measurements.heading = Measured::new(200.0, 18.0);

        let geometry = compute_geometry(&inputs);
        assert_eq!(geometry.plot_width, 800.0 - 40.0 - 20.0 - 50.0);
        assert_eq!(geometry.plot_height, 600.0 - 10.0 - 30.0 - 25.0 - 18.0);
        assert_eq!(geometry.left_offset, 40.0 + 50.0);
        assert_eq!(geometry.top_offset, 10.0 + 18.0);
    }

    #[test]
    fn oversized_chrome_clamps_to_zero_and_flags_degraded() {
        let mut inputs = GeometryInputs::new(100, 100).expect("valid size");
        inputs.measurements.left_axis = Measured::new(150.0, 0.0);
        let geometry = compute_geometry(&inputs);
        assert_eq!(geometry.plot_width, 0.0);
        assert!(geometry.degraded);
    }

    #[test]
    fn heading_at_bottom_does_not_shift_top_offset() {
        let mut inputs = GeometryInputs::new(400, 400).expect("valid size");
        inputs.heading_position = HeadingPosition::Bottom;
        inputs.measurements.heading = Measured::new(100.0, 20.0);
        let geometry = compute_geometry(&inputs);
        assert_eq!(geometry.top_offset, 0.0);
        assert_eq!(geometry.plot_height, 380.0);
    }

    #[test]
    fn outside_right_legend_reserves_width_and_sits_past_plot() {
        let mut inputs = GeometryInputs::new(600, 400).expect("valid size");
        inputs.legend = Some(LegendLayout::outside(LegendEdge::Right, 8.0));
        inputs.measurements.legend = Measured::new(90.0, 60.0);
        let geometry = compute_geometry(&inputs);
        assert_eq!(geometry.plot_width, 600.0 - 90.0 - 8.0);
        assert_eq!(geometry.legend_x, geometry.plot_width + 8.0);
        assert_eq!(geometry.legend_y, 0.0);
    }

    #[test]
    fn inside_legend_reserves_nothing() {
        let mut inputs = GeometryInputs::new(600, 400).expect("valid size");
        inputs.legend = Some(LegendLayout::inside(LegendEdge::Right, 5.0));
        inputs.measurements.legend = Measured::new(90.0, 60.0);
        let geometry = compute_geometry(&inputs);
        assert_eq!(geometry.plot_width, 600.0);
        assert_eq!(geometry.legend_x, 600.0 - 90.0 - 5.0);
    }

    #[test]
    fn zero_outer_size_is_a_configuration_error() {
        assert!(GeometryInputs::new(0, 300).is_err());
        assert!(GeometryInputs::new(500, 0).is_err());
    }

    #[test]
    fn increasing_chrome_size_never_grows_plot_dimension() {
        let mut inputs = GeometryInputs::new(500, 300).expect("valid size");
        inputs.measurements.left_axis = Measured::new(40.0, 0.0);
        let baseline = compute_geometry(&inputs);

        inputs.measurements.left_axis = Measured::new(55.0, 0.0);
        let wider_axis = compute_geometry(&inputs);
        assert!(wider_axis.plot_width < baseline.plot_width);
        assert_eq!(wider_axis.plot_height, baseline.plot_height);
    }

    #[test]
    fn convergence_with_zero_measurer_is_immediate() {
        let inputs = GeometryInputs::new(500, 300).expect("valid size");
        let layout = converge_geometry(&inputs, &ZeroMeasurer, DEFAULT_MAX_LAYOUT_PASSES);
        assert!(layout.converged);
        assert_eq!(layout.passes, 1);
        assert_eq!(layout.geometry.plot_width, 500.0);
    }

    #[test]
    fn convergence_reaches_fixed_measurements_in_two_passes() {
        let inputs = GeometryInputs::new(500, 300).expect("valid size");
        let measurer = FixedMeasurer::new()
            .with_size(ChromeElement::Axis(AxisPosition::Left), Measured::new(42.0, 0.0))
            .with_size(ChromeElement::Heading, Measured::new(120.0, 16.0));
        let layout = converge_geometry(&inputs, &measurer, DEFAULT_MAX_LAYOUT_PASSES);
        assert!(layout.converged);
        assert_eq!(layout.passes, 2);
        assert_eq!(layout.geometry.plot_width, 500.0 - 42.0);
        assert_eq!(layout.geometry.plot_height, 300.0 - 16.0);
        assert_eq!(
            layout.measurements.get(ChromeElement::Axis(AxisPosition::Left)),
            Measured::new(42.0, 0.0)
        );
    }

    #[test]
    fn seeded_measurements_from_previous_cycle_converge_in_one_pass() {
        let measurer = FixedMeasurer::new()
            .with_size(ChromeElement::Axis(AxisPosition::Left), Measured::new(42.0, 0.0));
        let mut inputs = GeometryInputs::new(500, 300).expect("valid size");
        inputs.measurements = ChromeMeasurements {
            left_axis: Measured::new(42.0, 0.0),
            ..ChromeMeasurements::default()
        };
        let layout = converge_geometry(&inputs, &measurer, DEFAULT_MAX_LAYOUT_PASSES);
        assert!(layout.converged);
        assert_eq!(layout.passes, 1);
    }
}
