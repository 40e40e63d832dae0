//! Error types for Runway

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Goal resolution error: {0}")]
    GoalResolution(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Augmentation error: {0}")]
    Augment(String),
}

pub type Result<T> = std::result::Result<T, Error>;
