use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A spin is already in progress")]
    SpinInProgress,

    #[error("No spin in progress")]
    NoSpinInProgress,

    #[error("No remaining spins")]
    NoSpinsLeft,

    #[error("Invalid prize distribution: {0}")]
    InvalidDistribution(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 面向用户的提示文本（控制台直接展示）
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                msg.clone()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::SpinInProgress => "The wheel is still spinning".to_string(),
            AppError::NoSpinInProgress => "Nothing to stop, the wheel is idle".to_string(),
            AppError::NoSpinsLeft => "No spins left, start a new turn".to_string(),
            AppError::StorageError(err) => {
                log::error!("Storage error: {err}");
                "Storage error".to_string()
            }
            _ => {
                log::error!("Internal error: {self}");
                "Internal error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passes_validation_text_through() {
        let err = AppError::ValidationError("At least 2 prizes are required".into());
        assert_eq!(err.user_message(), "At least 2 prizes are required");
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let err = AppError::InvalidDistribution("empty".into());
        assert_eq!(err.user_message(), "Internal error");
    }
}
