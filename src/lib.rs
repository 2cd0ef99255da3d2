//! plotframe: declarative plot layout and coordinate-mapping engine.
//!
//! The crate turns declared plot children (series, axes, heading, legend,
//! annotations) plus a fixed outer canvas size into final pixel-space draw
//! primitives. Rasterization is left to host backends behind the
//! [`render::Renderer`] trait.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{PlotConfig, PlotEngine};
pub use error::{PlotError, PlotResult};
