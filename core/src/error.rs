use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Advisor transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Advisor returned an empty response")]
    AdvisorEmptyResponse,

    #[error("Advisor returned an invalid JSON response. Raw output: {raw}")]
    AdvisorInvalidJson { raw: String },

    #[error("Advisor request failed with status {status}: {body}")]
    AdvisorRequestFailed { status: u16, body: String },

    #[error("Advisor unavailable: {reason}")]
    AdvisorUnavailable { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnalysisError {
    /// True for failures raised by the narrative advisor step.
    /// These never invalidate locally computed aggregates.
    pub fn is_advisor_fault(&self) -> bool {
        matches!(
            self,
            AnalysisError::Http(_)
                | AnalysisError::AdvisorEmptyResponse
                | AnalysisError::AdvisorInvalidJson { .. }
                | AnalysisError::AdvisorRequestFailed { .. }
                | AnalysisError::AdvisorUnavailable { .. }
        )
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
