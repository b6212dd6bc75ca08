use thiserror::Error;

/// Per-pair failure of an analysis pass. Neither kind is fatal: both are
/// turned into a displayable status for that pair.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("no data available for {0}")]
    NoData(String),

    #[error("{0}")]
    Computation(String),
}

impl AnalysisError {
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }
}
