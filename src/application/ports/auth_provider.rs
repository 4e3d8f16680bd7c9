use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 認証プロバイダが返す現在のユーザー
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// リモートの認証プロバイダ（外部コラボレータ）
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 現在のセッションユーザー。未ログインなら `None`。
    async fn current_user(&self) -> Option<AuthUser>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;

    /// 現在のユーザーの表示名を更新
    async fn update_display_name(&self, name: &str) -> Result<(), AppError>;
}
