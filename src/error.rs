use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("No champion data found in the log window")]
    NoData,

    /// The enforcement pass left cross-role pairs without synergy data.
    /// Never a data problem: it means the removal loop is wrong.
    #[error("Synergy coverage violated: {missing} pairs missing (e.g. {})", .sample.join(", "))]
    CoverageViolation { missing: usize, sample: Vec<String> },
}
