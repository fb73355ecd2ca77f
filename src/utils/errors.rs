use thiserror::Error;

/// Failure taxonomy for a charting run.
///
/// User input validation is deliberately not part of this enum: a rejected
/// menu selection is recovered locally by the prompt loop and never reaches
/// the top level (see `utils::prompt::SelectionError`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
    #[error("Chart error: {0}")]
    Chart(String),
}
