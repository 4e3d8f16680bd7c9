use serde::{Deserialize, Serialize};

/// プロフィール画像未設定を表すストア上のセンチネル値
pub const DEFAULT_PROFILE_IMAGE: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profile_image_url: String,
    pub created_at: i64,
    pub post_count: u32,
}

impl User {
    pub fn new(user_id: String, username: String, email: String) -> Self {
        Self {
            user_id,
            username,
            email,
            bio: String::new(),
            profile_image_url: DEFAULT_PROFILE_IMAGE.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
            post_count: 0,
        }
    }

    /// カスタム画像URLがあれば返す（"default" は未設定扱い）
    pub fn custom_profile_image(&self) -> Option<&str> {
        if self.profile_image_url.is_empty() || self.profile_image_url == DEFAULT_PROFILE_IMAGE {
            None
        } else {
            Some(&self.profile_image_url)
        }
    }
}
