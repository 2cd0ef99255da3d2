pub mod axis;
pub mod domain;
pub mod geometry;
pub mod measure;
pub mod position;
pub mod registry;
pub mod scale;
pub mod series;

pub use axis::{AxisConfig, AxisPosition, Padding, ScaleKind};
pub use domain::{AxisDimension, Domain, resolve_domain};
pub use geometry::{
    ConvergedLayout, DEFAULT_MAX_LAYOUT_PASSES, GeometryInputs, HeadingPosition, LegendEdge,
    LegendLayout, Margins, PlotGeometry, compute_geometry, converge_geometry,
};
pub use measure::{
    ChromeElement, ChromeMeasurements, ChromeMeasurer, FixedMeasurer, HeuristicTextMeasurer,
    Measured, ZeroMeasurer,
};
pub use position::{Coord, CoordSpec, EllipsePx, PointPx, PositionResolver};
pub use registry::{ExtentRegistry, RegistryAction};
pub use scale::{BandAlignment, PixelRange, Scale, ScaleCache};
pub use series::{AxisBinding, SeriesDescriptor, SeriesExtent, datetime_to_unix_seconds};
