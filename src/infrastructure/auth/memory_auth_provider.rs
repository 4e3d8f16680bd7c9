use crate::application::ports::auth_provider::{AuthProvider, AuthUser};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    password: String,
    display_name: Option<String>,
}

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    current: Option<String>,
}

/// 認証プロバイダのインメモリ実装（email + password）。
#[derive(Clone, Default)]
pub struct MemoryAuthProvider {
    state: Arc<RwLock<AuthState>>,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sign_out(&self) {
        let mut state = self.state.write().await;
        state.current = None;
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn current_user(&self) -> Option<AuthUser> {
        let state = self.state.read().await;
        let email = state.current.as_ref()?;
        let account = state.accounts.get(email)?;
        Some(AuthUser {
            user_id: account.user_id.clone(),
            display_name: account.display_name.clone(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get(email)
            .filter(|account| account.password == password)
            .cloned()
            .ok_or_else(|| AppError::NotAuthenticated("invalid email or password".into()))?;

        state.current = Some(email.to_string());
        Ok(AuthUser {
            user_id: account.user_id,
            display_name: account.display_name,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let mut state = self.state.write().await;
        if state.accounts.contains_key(email) {
            return Err(AppError::Store("email already registered".into()));
        }

        let account = Account {
            user_id: Uuid::new_v4().to_string(),
            password: password.to_string(),
            display_name: None,
        };
        let user = AuthUser {
            user_id: account.user_id.clone(),
            display_name: None,
        };
        state.accounts.insert(email.to_string(), account);
        // プロバイダ準拠: サインアップ直後はそのユーザーでログイン状態になる
        state.current = Some(email.to_string());
        Ok(user)
    }

    async fn update_display_name(&self, name: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let email = state
            .current
            .clone()
            .ok_or_else(|| AppError::NotAuthenticated("no active session".into()))?;
        if let Some(account) = state.accounts.get_mut(&email) {
            account.display_name = Some(name.to_string());
        }
        Ok(())
    }
}
