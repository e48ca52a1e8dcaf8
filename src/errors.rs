//! Unified application error type.
//! Every tracking operation (guard, duty, ping, checkpoint, day view) returns
//! AppError so the CLI boundary can turn any failure into one user-facing line.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Tracking taxonomy
    // ---------------------------
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Photo upload failed: {0}")]
    Upload(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// Short machine-friendly code, used for the audit log and exit messages.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Upload(_) => "upload",
            AppError::Persistence(_) => "persistence",
            AppError::Io(_) => "io",
            AppError::Migration(_) => "migration",
            AppError::InvalidDate(_) | AppError::InvalidTimestamp(_) => "parse",
            AppError::Config(_) => "config",
            AppError::Export(_) => "export",
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
