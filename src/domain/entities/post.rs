use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// フィードに表示される投稿エンティティ。
///
/// `post_id` と `created_at` はリモートストアが採番するため、
/// 初回永続化までは `None`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub post_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub caption: String,
    pub image_base64: Option<String>,
    pub has_image: bool,
    /// サーバー採番のUnixミリ秒タイムスタンプ
    pub created_at: Option<i64>,
    pub like_count: u32,
    pub comment_count: u32,
    pub liked_by: HashMap<String, bool>,
}

impl Post {
    pub fn new(user_id: String, username: String, caption: String) -> Self {
        Self {
            post_id: None,
            user_id,
            username,
            caption,
            image_base64: None,
            has_image: false,
            created_at: None,
            like_count: 0,
            comment_count: 0,
            liked_by: HashMap::new(),
        }
    }

    /// 画像の有無フラグは常に payload と一致させる
    pub fn set_image(&mut self, image_base64: Option<String>) {
        self.has_image = image_base64
            .as_deref()
            .map(|payload| !payload.is_empty())
            .unwrap_or(false);
        self.image_base64 = if self.has_image { image_base64 } else { None };
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.contains_key(user_id)
    }

    pub fn apply_like(&mut self, user_id: &str) {
        if self.liked_by.insert(user_id.to_string(), true).is_none() {
            self.like_count += 1;
        }
    }

    pub fn apply_unlike(&mut self, user_id: &str) {
        if self.liked_by.remove(user_id).is_some() && self.like_count > 0 {
            self.like_count -= 1;
        }
    }

    pub fn assign_id(&mut self, post_id: String) {
        // 投稿IDの採番は一度きり
        if self.post_id.is_none() {
            self.post_id = Some(post_id);
        }
    }
}
