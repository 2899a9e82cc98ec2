//! Error types for abstat
//!
//! Statistical entry points never return these: invalid statistical input
//! degrades to a neutral answer instead. Errors are reserved for
//! configuration, projections and the command-line front end.

use serde::Serialize;
use thiserror::Error;

/// Reasons a set of counts cannot be used for inference
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputError {
    #[error("visits must be positive (got {visits})")]
    NoVisits { visits: u64 },

    #[error("conversions ({conversions}) exceed visits ({visits})")]
    ConversionsExceedVisits { visits: u64, conversions: u64 },

    #[error("invalid counts: control={control}, variant={variant}")]
    InvalidCounts { control: u64, variant: u64 },
}

/// Errors from fallible analysis operations
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("At least one arm visit count is required for a projection")]
    EmptyArms,

    #[error("Projection overflows the calendar: {date} + {days} days")]
    ProjectionOverflow { date: chrono::NaiveDate, days: u64 },

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fallible analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
