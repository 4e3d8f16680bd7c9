use crate::shared::validation::ValidationFailureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),
    #[error("Validation error ({kind}): {message}")]
    Validation {
        kind: ValidationFailureKind,
        message: String,
    },
    #[error("Image processing error: {0}")]
    ImageProcessing(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(kind: ValidationFailureKind, message: impl Into<String>) -> Self {
        AppError::Validation {
            kind,
            message: message.into(),
        }
    }

    /// 再ログインを促すべきエラーかどうか
    pub fn requires_login(&self) -> bool {
        matches!(self, AppError::NotAuthenticated(_))
    }

    /// 一時的な通知で回復できるエラーかどうか（致命的エラーは存在しない）
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Store(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageProcessing(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            AppError::ImageProcessing("encoding task cancelled".to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
