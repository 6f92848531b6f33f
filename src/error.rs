use std::path::PathBuf;

use thiserror::Error;

use crate::fuel::FuelError;

#[derive(Error, Debug)]
pub enum FigureError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fuel(#[from] FuelError),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(String),

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Column '{column}', row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Cannot read config {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FigureError>;
