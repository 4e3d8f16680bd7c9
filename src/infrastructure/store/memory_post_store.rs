use crate::application::ports::post_store::{LikedByOp, PostDocument, PostPatch, RemotePostStore};
use crate::domain::entities::{Post, User};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct StoreState {
    posts: HashMap<String, Value>,
    users: HashMap<String, User>,
    last_assigned_at: i64,
}

/// ドキュメントストアのインメモリ実装。
///
/// 本物のマネージドストア同様、ID とタイムスタンプはサーバー側
/// （ここ）で採番し、部分更新はドキュメント単位で原子的に適用する。
/// 生ドキュメントは JSON として保持し、読み出し時に `PostDocument` の
/// default 規則でハイドレーションする。
#[derive(Clone, Default)]
pub struct MemoryPostStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用: 生ドキュメントを直接投入する（欠損フィールドの再現など）
    pub async fn seed_raw_post(&self, post_id: &str, document: Value) {
        let mut state = self.state.write().await;
        state.posts.insert(post_id.to_string(), document);
    }

    pub async fn post_count(&self) -> usize {
        let state = self.state.read().await;
        state.posts.len()
    }

    fn assign_created_at(state: &mut StoreState) -> i64 {
        // フィード順序の前提（単調非減少）を満たすタイムスタンプを採番する
        let now = chrono::Utc::now().timestamp_millis();
        let assigned = now.max(state.last_assigned_at + 1);
        state.last_assigned_at = assigned;
        assigned
    }
}

#[async_trait]
impl RemotePostStore for MemoryPostStore {
    async fn query_recent(&self, limit: usize) -> Result<Vec<Post>, AppError> {
        let state = self.state.read().await;
        let mut documents = Vec::with_capacity(state.posts.len());
        for (id, raw) in state.posts.iter() {
            let mut doc: PostDocument = serde_json::from_value(raw.clone())?;
            // ドキュメントIDが本来の識別子。postId フィールドは書き戻し用の複製。
            if doc.post_id.is_none() {
                doc.post_id = Some(id.clone());
            }
            documents.push(doc);
        }

        documents.sort_by(|a, b| {
            b.created_at
                .unwrap_or(0)
                .cmp(&a.created_at.unwrap_or(0))
                .then_with(|| b.post_id.cmp(&a.post_id))
        });
        documents.truncate(limit);

        Ok(documents.into_iter().map(Post::from).collect())
    }

    async fn create_post(&self, document: &PostDocument) -> Result<String, AppError> {
        let mut state = self.state.write().await;
        let post_id = Uuid::new_v4().to_string();
        let created_at = Self::assign_created_at(&mut state);

        let mut raw = serde_json::to_value(document)?;
        raw["createdAt"] = json!(created_at);
        state.posts.insert(post_id.clone(), raw);
        Ok(post_id)
    }

    async fn update_post(&self, post_id: &str, patch: PostPatch) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let raw = state
            .posts
            .get_mut(post_id)
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;

        match patch {
            PostPatch::AssignPostId(id) => {
                raw["postId"] = json!(id);
            }
            PostPatch::Like { like_count, op } => {
                raw["likeCount"] = json!(like_count);
                let liked_by = raw
                    .as_object_mut()
                    .ok_or_else(|| AppError::Store("post document is not an object".into()))?
                    .entry("likedBy")
                    .or_insert_with(|| json!({}));
                let map = liked_by
                    .as_object_mut()
                    .ok_or_else(|| AppError::Store("likedBy is not a map".into()))?;
                match op {
                    LikedByOp::Set(user_id) => {
                        map.insert(user_id, json!(true));
                    }
                    LikedByOp::Delete(user_id) => {
                        map.remove(&user_id);
                    }
                }
            }
        }
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.users.insert(user.user_id.clone(), user.clone());
        Ok(())
    }
}
