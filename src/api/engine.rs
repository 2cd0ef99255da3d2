use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::api::{
    AnnotationDecl, AnnotationShape, CoordinateContext, HeadingDecl, LegendDecl, PlotChild,
    PlotConfig, SeriesDecl,
};
use crate::core::{
    AxisConfig, AxisDimension, AxisPosition, BandAlignment, ChromeMeasurements, ChromeMeasurer,
    ConvergedLayout, ExtentRegistry, GeometryInputs, HeadingPosition, PixelRange, PlotGeometry,
    PositionResolver, RegistryAction, Scale, ScaleCache, SeriesDescriptor, converge_geometry,
    resolve_domain,
};
use crate::error::{PlotError, PlotResult};
use crate::render::{
    Color, EllipsePrimitive, LineStyle, MarkerPrimitive, PolylinePrimitive, RenderFrame,
    TextHAlign, TextPrimitive,
};

const ANNOTATION_COLOR: Color = Color::rgb(0.15, 0.15, 0.15);
const MARKER_RADIUS_PX: f64 = 3.0;
const ANNOTATION_STROKE_WIDTH: f64 = 1.0;
const GRID_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.12);
const GRID_STROKE_WIDTH: f64 = 1.0;
const GRID_TARGET_SPACING_PX: f64 = 64.0;
const GRID_MIN_TICKS: usize = 2;
const GRID_MAX_TICKS: usize = 12;

/// Everything one completed render cycle produces.
#[derive(Debug)]
pub struct CycleOutput {
    pub frame: RenderFrame,
    pub context: CoordinateContext,
    pub layout: ConvergedLayout,
}

/// Declared children split by structural role.
///
/// Partitioning keys off the declaration variant, never list position.
struct Partitioned<'a> {
    series: Vec<&'a SeriesDecl>,
    axes: Vec<&'a AxisConfig>,
    heading: Option<&'a HeadingDecl>,
    legend: Option<&'a LegendDecl>,
    annotations: Vec<&'a AnnotationDecl>,
}

/// The plot orchestrator.
///
/// Owns the extent registry, palette assignment and measurement feedback
/// state across cycles; each [`PlotEngine::render_cycle`] call runs the full
/// registry -> domain -> scale -> viewport-sizing pipeline over the declared
/// children and emits pixel-space primitives.
pub struct PlotEngine {
    config: PlotConfig,
    palette: Vec<Color>,
    registry: ExtentRegistry,
    color_slots: IndexMap<String, usize>,
    next_color_slot: usize,
    scale_cache: ScaleCache,
    last_measurements: ChromeMeasurements,
    cycle: u64,
}

impl PlotEngine {
    pub fn new(config: PlotConfig) -> PlotResult<Self> {
        config.validate()?;
        let palette = config.palette()?;
        Ok(Self {
            config,
            palette,
            registry: ExtentRegistry::default(),
            color_slots: IndexMap::new(),
            next_color_slot: 0,
            scale_cache: ScaleCache::new(),
            last_measurements: ChromeMeasurements::default(),
            cycle: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Current registry snapshot (registration-ordered series state).
    #[must_use]
    pub fn registry(&self) -> &ExtentRegistry {
        &self.registry
    }

    /// Chrome measurements carried over from the last completed cycle.
    #[must_use]
    pub fn last_measurements(&self) -> ChromeMeasurements {
        self.last_measurements
    }

    /// Runs one full cycle over the declared children.
    pub fn render_cycle(
        &mut self,
        children: &[PlotChild],
        measurer: &dyn ChromeMeasurer,
    ) -> PlotResult<CycleOutput> {
        self.cycle += 1;
        let parts = partition(children)?;
        for axis in &parts.axes {
            axis.validate()?;
        }

        self.sync_registry(&parts.series)?;
        let series_snapshot: Vec<SeriesDescriptor> = self.registry.series().cloned().collect();
        let series_colors = self.assign_colors(&series_snapshot);

        // Geometry is seeded with the previous cycle's measurements; the
        // convergence loop makes the one-cycle lag explicit and bounded.
        let inputs = GeometryInputs {
            outer_width: self.config.width,
            outer_height: self.config.height,
            margins: self.config.margins,
            heading_position: parts
                .heading
                .map_or(HeadingPosition::default(), |heading| heading.position),
            legend: parts.legend.map(|legend| legend.layout()),
            measurements: self.last_measurements,
        };
        let layout = converge_geometry(&inputs, measurer, self.config.max_layout_passes);
        self.last_measurements = layout.measurements;
        self.warn_on_tight_chrome(&layout.measurements);

        let geometry = layout.geometry;
        let mut x_scales: IndexMap<String, Scale> = IndexMap::new();
        let mut y_scales: IndexMap<String, Scale> = IndexMap::new();
        for axis in &parts.axes {
            let (dimension, range) = if axis.position.is_horizontal() {
                (AxisDimension::X, PixelRange::new(0.0, geometry.plot_width)?)
            } else {
                // Vertical axes invert: domain min sits at the plot bottom.
                (AxisDimension::Y, PixelRange::new(geometry.plot_height, 0.0)?)
            };
            let domain = resolve_domain(axis, dimension, &series_snapshot)?;
            let scale = self
                .scale_cache
                .get_or_build(&domain, range, axis.scale_kind, BandAlignment::default())?
                .clone();
            if axis.position.is_horizontal() {
                x_scales.insert(axis.id.clone(), scale);
            } else {
                y_scales.insert(axis.id.clone(), scale);
            }
        }

        let context = CoordinateContext::new(geometry, x_scales, y_scales, series_colors);
        let frame = self.build_frame(&parts, &context, &layout)?;
        debug!(
            cycle = self.cycle,
            series = parts.series.len(),
            axes = parts.axes.len(),
            annotations = parts.annotations.len(),
            passes = layout.passes,
            "render cycle complete"
        );

        Ok(CycleOutput {
            frame,
            context,
            layout,
        })
    }

    /// Diffs declared series against the registry: upsert what changed,
    /// remove what unmounted.
    fn sync_registry(&mut self, declared: &[&SeriesDecl]) -> PlotResult<()> {
        for decl in declared {
            let descriptor = decl.descriptor()?;
            if self.registry.get(&descriptor.id) != Some(&descriptor) {
                self.registry = self
                    .registry
                    .dispatch(RegistryAction::UpsertSeries(descriptor));
            }
        }

        let stale: Vec<String> = self
            .registry
            .ids()
            .filter(|id| !declared.iter().any(|decl| decl.id == *id))
            .map(str::to_owned)
            .collect();
        for id in stale {
            self.registry = self.registry.dispatch(RegistryAction::RemoveSeries { id });
        }
        Ok(())
    }

    /// Palette slots are assigned once per series id in first-seen order and
    /// never reassigned, so color identity survives reordering and removal of
    /// unrelated series.
    fn assign_colors(&mut self, series: &[SeriesDescriptor]) -> IndexMap<String, Color> {
        let mut colors = IndexMap::new();
        for descriptor in series {
            let slot = *self
                .color_slots
                .entry(descriptor.id.clone())
                .or_insert_with(|| {
                    let slot = self.next_color_slot;
                    self.next_color_slot += 1;
                    slot
                });
            colors.insert(
                descriptor.id.clone(),
                self.palette[slot % self.palette.len()],
            );
        }
        colors
    }

    fn warn_on_tight_chrome(&self, measurements: &ChromeMeasurements) {
        let half_width = f64::from(self.config.width) / 2.0;
        let half_height = f64::from(self.config.height) / 2.0;
        if measurements.left_axis.width + measurements.right_axis.width > half_width {
            warn!("vertical axis labels consume more than half the canvas width");
        }
        if measurements.top_axis.height
            + measurements.bottom_axis.height
            + measurements.heading.height
            > half_height
        {
            warn!("horizontal chrome consumes more than half the canvas height");
        }
    }

    fn build_frame(
        &self,
        parts: &Partitioned<'_>,
        context: &CoordinateContext,
        layout: &ConvergedLayout,
    ) -> PlotResult<RenderFrame> {
        let geometry = context.geometry;
        let mut frame = RenderFrame::new(self.config.width, self.config.height, geometry);

        // Grid lines go in first so series and annotations draw over them.
        for axis in &parts.axes {
            if !axis.show_primary_grid_lines {
                continue;
            }
            let scale = if axis.position.is_horizontal() {
                context.x_scale(&axis.id)
            } else {
                context.y_scale(&axis.id)
            };
            let Some(scale) = scale else { continue };
            emit_grid_lines(axis.position.is_horizontal(), scale, &geometry, &mut frame);
        }

        for decl in &parts.series {
            let x_scale = context.x_scale(&decl.x_axis).ok_or_else(|| {
                PlotError::Configuration(format!(
                    "series `{}` bound to undeclared x axis `{}`",
                    decl.id, decl.x_axis
                ))
            })?;
            let y_scale = context.y_scale(&decl.y_axis).ok_or_else(|| {
                PlotError::Configuration(format!(
                    "series `{}` bound to undeclared y axis `{}`",
                    decl.id, decl.y_axis
                ))
            })?;
            if decl.x.len() < 2 {
                continue;
            }

            let mut points = Vec::with_capacity(decl.x.len());
            for (x, y) in decl.x.iter().zip(&decl.y) {
                points.push((
                    geometry.left_offset + x_scale.position(*x)?,
                    geometry.top_offset + y_scale.position(*y)?,
                ));
            }
            frame.polylines.push(PolylinePrimitive {
                points,
                style: decl.style,
                color: context.series_color(&decl.id).unwrap_or(ANNOTATION_COLOR),
            });
        }

        for annotation in &parts.annotations {
            self.emit_annotation(annotation, context, &mut frame)?;
        }

        if let Some(heading) = parts.heading {
            let heading_height = layout.measurements.heading.height;
            let y = match heading.position {
                HeadingPosition::Top => self.config.margins.top + heading_height / 2.0,
                HeadingPosition::Bottom => {
                    geometry.top_offset
                        + geometry.plot_height
                        + layout.measurements.bottom_axis.height
                        + heading_height / 2.0
                }
            };
            frame.texts.push(TextPrimitive::new(
                heading.text.clone(),
                geometry.left_offset + geometry.plot_width / 2.0,
                y,
                self.config.font_size_px,
                ANNOTATION_COLOR,
                TextHAlign::Center,
            ));
        }

        if parts.legend.is_some() {
            let line_height = self.config.font_size_px * 1.2;
            for (index, descriptor) in self.registry.series().enumerate() {
                frame.texts.push(TextPrimitive::new(
                    descriptor.label.clone(),
                    geometry.legend_x,
                    geometry.legend_y + line_height * index as f64 + self.config.font_size_px,
                    self.config.font_size_px,
                    context
                        .series_color(&descriptor.id)
                        .unwrap_or(ANNOTATION_COLOR),
                    TextHAlign::Left,
                ));
            }
        }

        for axis in &parts.axes {
            let Some(label) = &axis.label else { continue };
            let (x, y, align) = axis_label_anchor(axis, &geometry, &self.config);
            frame.texts.push(TextPrimitive::new(
                label.clone(),
                x,
                y,
                self.config.font_size_px,
                ANNOTATION_COLOR,
                align,
            ));
        }

        Ok(frame)
    }

    fn emit_annotation(
        &self,
        annotation: &AnnotationDecl,
        context: &CoordinateContext,
        frame: &mut RenderFrame,
    ) -> PlotResult<()> {
        let geometry = context.geometry;
        let x_scale = match &annotation.x_axis {
            Some(id) => Some(context.x_scale(id).ok_or_else(|| {
                PlotError::Configuration(format!("annotation bound to undeclared x axis `{id}`"))
            })?),
            None => context.first_x_scale(),
        };
        let y_scale = match &annotation.y_axis {
            Some(id) => Some(context.y_scale(id).ok_or_else(|| {
                PlotError::Configuration(format!("annotation bound to undeclared y axis `{id}`"))
            })?),
            None => context.first_y_scale(),
        };
        let resolver = PositionResolver::new(&context.geometry, x_scale, y_scale);

        match &annotation.shape {
            AnnotationShape::Point { x, y } => {
                let point = resolver.resolve_point(x, y)?;
                frame.markers.push(MarkerPrimitive {
                    x: geometry.left_offset + point.x,
                    y: geometry.top_offset + point.y,
                    radius: MARKER_RADIUS_PX,
                    color: ANNOTATION_COLOR,
                });
            }
            AnnotationShape::Ellipse { cx, cy, rx, ry } => {
                let ellipse = resolver.resolve_ellipse(cx, cy, rx, ry)?;
                frame.ellipses.push(EllipsePrimitive {
                    cx: geometry.left_offset + ellipse.cx,
                    cy: geometry.top_offset + ellipse.cy,
                    rx: ellipse.rx,
                    ry: ellipse.ry,
                    stroke_width: ANNOTATION_STROKE_WIDTH,
                    color: ANNOTATION_COLOR,
                });
            }
        }
        Ok(())
    }
}

fn partition(children: &[PlotChild]) -> PlotResult<Partitioned<'_>> {
    let mut parts = Partitioned {
        series: Vec::new(),
        axes: Vec::new(),
        heading: None,
        legend: None,
        annotations: Vec::new(),
    };

    for child in children {
        match child {
            PlotChild::Series(decl) => {
                if parts.series.iter().any(|existing| existing.id == decl.id) {
                    return Err(PlotError::Configuration(format!(
                        "duplicate series id `{}`",
                        decl.id
                    )));
                }
                parts.series.push(decl);
            }
            PlotChild::Axis(axis) => {
                if parts.axes.iter().any(|existing| existing.id == axis.id) {
                    return Err(PlotError::Configuration(format!(
                        "duplicate axis id `{}`",
                        axis.id
                    )));
                }
                parts.axes.push(axis);
            }
            PlotChild::Heading(decl) => {
                if parts.heading.is_some() {
                    return Err(PlotError::Configuration(
                        "at most one heading declaration is allowed".to_owned(),
                    ));
                }
                parts.heading = Some(decl);
            }
            PlotChild::Legend(decl) => {
                if parts.legend.is_some() {
                    return Err(PlotError::Configuration(
                        "at most one legend declaration is allowed".to_owned(),
                    ));
                }
                parts.legend = Some(decl);
            }
            PlotChild::Annotation(decl) => parts.annotations.push(decl),
        }
    }

    Ok(parts)
}

/// Spacing-driven tick count for one axis span.
fn grid_tick_count(axis_span_px: f64) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return GRID_MIN_TICKS;
    }
    let raw = (axis_span_px / GRID_TARGET_SPACING_PX).floor() as usize + 1;
    raw.clamp(GRID_MIN_TICKS, GRID_MAX_TICKS)
}

fn emit_grid_lines(
    horizontal_axis: bool,
    scale: &Scale,
    geometry: &PlotGeometry,
    frame: &mut RenderFrame,
) {
    let span = if horizontal_axis {
        geometry.plot_width
    } else {
        geometry.plot_height
    };
    let style = LineStyle {
        stroke_width: GRID_STROKE_WIDTH,
        dashed: false,
    };
    for position in scale.tick_positions(grid_tick_count(span)) {
        let points = if horizontal_axis {
            vec![
                (geometry.left_offset + position, geometry.top_offset),
                (
                    geometry.left_offset + position,
                    geometry.top_offset + geometry.plot_height,
                ),
            ]
        } else {
            vec![
                (geometry.left_offset, geometry.top_offset + position),
                (
                    geometry.left_offset + geometry.plot_width,
                    geometry.top_offset + position,
                ),
            ]
        };
        frame.polylines.push(PolylinePrimitive {
            points,
            style,
            color: GRID_COLOR,
        });
    }
}

fn axis_label_anchor(
    axis: &AxisConfig,
    geometry: &PlotGeometry,
    config: &PlotConfig,
) -> (f64, f64, TextHAlign) {
    match axis.position {
        AxisPosition::Bottom => (
            geometry.left_offset + geometry.plot_width / 2.0,
            geometry.top_offset + geometry.plot_height + config.font_size_px * 2.0,
            TextHAlign::Center,
        ),
        AxisPosition::Top => (
            geometry.left_offset + geometry.plot_width / 2.0,
            geometry.top_offset - config.font_size_px,
            TextHAlign::Center,
        ),
        AxisPosition::Left => (
            config.margins.left,
            geometry.top_offset + geometry.plot_height / 2.0,
            TextHAlign::Left,
        ),
        AxisPosition::Right => (
            f64::from(config.width) - config.margins.right,
            geometry.top_offset + geometry.plot_height / 2.0,
            TextHAlign::Right,
        ),
    }
}
