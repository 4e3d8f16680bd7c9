use crate::shared::{AppError, ValidationFailureKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 投稿キャプション。前後空白を除いた上で空でないことを保証する。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caption(String);

impl Caption {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation(
                ValidationFailureKind::EmptyCaption,
                "Please enter a caption",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Caption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
