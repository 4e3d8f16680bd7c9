use crate::application::ports::post_store::RemotePostStore;
use crate::domain::entities::User;
use crate::shared::error::AppError;
use std::sync::Arc;

/// ユーザープロフィールの参照。
pub struct UserService {
    store: Arc<dyn RemotePostStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn RemotePostStore>) -> Self {
        Self { store }
    }

    pub async fn profile(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.store.get_user(user_id).await
    }

    /// 投稿者アバターの表示用URL。センチネル値（"default"）や
    /// プロフィール未作成のユーザーは `None` となり、
    /// 呼び出し側はプレースホルダーを表示する。
    pub async fn profile_image_url(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let user = self.store.get_user(user_id).await?;
        Ok(user.and_then(|u| u.custom_profile_image().map(str::to_string)))
    }
}
