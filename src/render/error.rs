use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write chart")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "chart")]
    #[error("Failed to build chart data")]
    Frame(#[from] polars::error::PolarsError),
}
