use serde::{Deserialize, Serialize};
use std::fmt;

/// 入力検証エラーの分類。プレゼンテーション層がメッセージ出し分けに使う。
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailureKind {
    Generic,
    EmptyCaption,
    MissingField,
    PasswordTooShort,
    PasswordMismatch,
}

impl ValidationFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationFailureKind::Generic => "generic",
            ValidationFailureKind::EmptyCaption => "empty_caption",
            ValidationFailureKind::MissingField => "missing_field",
            ValidationFailureKind::PasswordTooShort => "password_too_short",
            ValidationFailureKind::PasswordMismatch => "password_mismatch",
        }
    }
}

impl fmt::Display for ValidationFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
