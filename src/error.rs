use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid scale domain: {0}")]
    Domain(String),
}
