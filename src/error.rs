use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("result contains no gRNA candidates")]
    EmptyResult,
    #[error("malformed record at '{field}': {reason}")]
    MalformedRecord { field: String, reason: String },
    #[error("analysis service returned status {status}: {detail}")]
    Service { status: u16, detail: String },
    #[error("analysis service request failed: {0}")]
    Transport(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] grna_render::RenderError),
}

impl ReportError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Fatal to the report: the caller has no result to show.
    pub fn is_fatal_input(&self) -> bool {
        matches!(self, Self::EmptyResult | Self::MalformedRecord { .. })
    }
}
