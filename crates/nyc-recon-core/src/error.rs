// crates/nyc-recon-core/src/error.rs

use thiserror::Error;

use crate::clean::CleaningError;

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Cleaning failed: {0}")]
    Cleaning(#[from] CleaningError),
}

pub type Result<T> = std::result::Result<T, ReconError>;
