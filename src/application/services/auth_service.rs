use crate::application::ports::auth_provider::{AuthProvider, AuthUser};
use crate::application::ports::post_store::RemotePostStore;
use crate::domain::entities::User;
use crate::shared::config::AuthConfig;
use crate::shared::error::AppError;
use crate::shared::validation::ValidationFailureKind;
use std::sync::Arc;
use tracing::info;

/// 登録・ログインのフロー。
///
/// 入力検証はすべてプロバイダ呼び出しの前に行い、
/// 最初に失敗した検証のエラーだけを返す。
pub struct AuthService {
    auth: Arc<dyn AuthProvider>,
    store: Arc<dyn RemotePostStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        store: Arc<dyn RemotePostStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            auth,
            store,
            config,
        }
    }

    /// アカウント登録。成功するとログイン状態になり、
    /// プロフィールドキュメントと表示名が作成される。
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<User, AppError> {
        if username.trim().is_empty()
            || email.trim().is_empty()
            || password.is_empty()
            || confirm.is_empty()
        {
            return Err(AppError::validation(
                ValidationFailureKind::MissingField,
                "Please fill in all fields",
            ));
        }
        if password.chars().count() < self.config.min_password_len {
            return Err(AppError::validation(
                ValidationFailureKind::PasswordTooShort,
                format!(
                    "Password must be at least {} characters",
                    self.config.min_password_len
                ),
            ));
        }
        if password != confirm {
            return Err(AppError::validation(
                ValidationFailureKind::PasswordMismatch,
                "Passwords do not match",
            ));
        }

        let session = self.auth.sign_up(email, password).await?;
        let user = User::new(
            session.user_id,
            username.trim().to_string(),
            email.trim().to_string(),
        );
        self.store.create_user(&user).await?;
        self.auth.update_display_name(&user.username).await?;

        info!(user_id = %user.user_id, "account registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation(
                ValidationFailureKind::MissingField,
                "Please fill in all fields",
            ));
        }
        self.auth.sign_in(email, password).await
    }

    /// 現在のセッション。未ログインなら `None`。
    pub async fn session(&self) -> Option<AuthUser> {
        self.auth.current_user().await
    }
}
