use thiserror::Error;

/// Errors produced while decoding a program tree. A program that fails to decode
/// never starts running.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("program json parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("program syntax error at {path}: {reason}")]
    Syntax { path: String, reason: String },
}

impl ProgramError {
    pub(crate) fn syntax(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ProgramError::Syntax {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
