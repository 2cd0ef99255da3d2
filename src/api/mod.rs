mod context;
mod declarations;
mod engine;
mod plot_config;

pub use context::CoordinateContext;
pub use declarations::{
    AnnotationDecl, AnnotationShape, HeadingDecl, LegendDecl, PLOT_DECLARATION_JSON_SCHEMA_V1,
    PlotChild, PlotDeclarationJsonContractV1, SeriesDecl,
};
pub use engine::{CycleOutput, PlotEngine};
pub use plot_config::{DEFAULT_PALETTE, PlotConfig};
