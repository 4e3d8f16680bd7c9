use crate::application::ports::cache::{FeedCache, LikeToggle};
use crate::domain::entities::Post;
use crate::domain::value_objects::ScrollAnchor;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct FeedState {
    posts: Vec<Post>,
    anchor: ScrollAnchor,
}

/// 表示中フィードのインメモリキャッシュ。
///
/// 同期サイクルごとに丸ごと差し替えられ、サイクル間は
/// InteractionService がエントリを個別にパッチする。
#[derive(Clone)]
pub struct FeedCacheService {
    state: Arc<RwLock<FeedState>>,
    capacity: usize,
}

impl FeedCacheService {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(FeedState::default())),
            capacity,
        }
    }

    pub async fn replace_all(&self, mut posts: Vec<Post>) -> usize {
        posts.truncate(self.capacity);
        let count = posts.len();
        let mut state = self.state.write().await;
        state.posts = posts;
        count
    }

    pub async fn entries(&self) -> Vec<Post> {
        let state = self.state.read().await;
        state.posts.clone()
    }

    pub async fn get(&self, post_id: &str) -> Option<Post> {
        let state = self.state.read().await;
        state
            .posts
            .iter()
            .find(|post| post.post_id.as_deref() == Some(post_id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        let state = self.state.read().await;
        state.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 読み取り・反転・書き込みを単一の書き込みロック内で行う。
    /// 1回目のトグルがリモート確認前でも、2回目はローカルの最新状態を
    /// 観測して反転するため二重加算にならない。
    pub async fn toggle_like(&self, post_id: &str, user_id: &str) -> Option<LikeToggle> {
        let mut state = self.state.write().await;
        let entry = state
            .posts
            .iter_mut()
            .find(|post| post.post_id.as_deref() == Some(post_id))?;

        let snapshot = entry.clone();
        let now_liked = if entry.is_liked_by(user_id) {
            entry.apply_unlike(user_id);
            false
        } else {
            entry.apply_like(user_id);
            true
        };

        Some(LikeToggle {
            snapshot,
            updated: entry.clone(),
            now_liked,
        })
    }

    pub async fn restore(&self, snapshot: Post) {
        let mut state = self.state.write().await;
        if let Some(entry) = state
            .posts
            .iter_mut()
            .find(|post| post.post_id == snapshot.post_id)
        {
            *entry = snapshot;
        }
    }

    pub async fn save_anchor(&self, index: usize) {
        let mut state = self.state.write().await;
        state.anchor = ScrollAnchor::new(index);
    }

    pub async fn anchor(&self) -> ScrollAnchor {
        let state = self.state.read().await;
        state.anchor
    }
}

#[async_trait]
impl FeedCache for FeedCacheService {
    async fn replace_all(&self, posts: Vec<Post>) -> usize {
        FeedCacheService::replace_all(self, posts).await
    }

    async fn entries(&self) -> Vec<Post> {
        FeedCacheService::entries(self).await
    }

    async fn get(&self, post_id: &str) -> Option<Post> {
        FeedCacheService::get(self, post_id).await
    }

    async fn len(&self) -> usize {
        FeedCacheService::len(self).await
    }

    async fn toggle_like(&self, post_id: &str, user_id: &str) -> Option<LikeToggle> {
        FeedCacheService::toggle_like(self, post_id, user_id).await
    }

    async fn restore(&self, snapshot: Post) {
        FeedCacheService::restore(self, snapshot).await
    }

    async fn save_anchor(&self, index: usize) {
        FeedCacheService::save_anchor(self, index).await
    }

    async fn anchor(&self) -> ScrollAnchor {
        FeedCacheService::anchor(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_id(id: &str, likes: &[&str]) -> Post {
        let mut post = Post::new("author".into(), "alice".into(), format!("caption-{id}"));
        post.post_id = Some(id.to_string());
        for user in likes {
            post.apply_like(user);
        }
        post
    }

    #[tokio::test]
    async fn replace_all_caps_at_capacity() {
        let cache = FeedCacheService::new(2);
        let posts = vec![
            post_with_id("1", &[]),
            post_with_id("2", &[]),
            post_with_id("3", &[]),
        ];

        let count = cache.replace_all(posts).await;
        assert_eq!(count, 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn toggle_like_roundtrip_restores_original_state() {
        let cache = FeedCacheService::new(50);
        cache
            .replace_all(vec![post_with_id("p1", &["a", "b", "c"])])
            .await;

        let liked = cache.toggle_like("p1", "u").await.unwrap();
        assert!(liked.now_liked);
        assert_eq!(liked.updated.like_count, 4);
        assert!(liked.updated.is_liked_by("u"));

        let unliked = cache.toggle_like("p1", "u").await.unwrap();
        assert!(!unliked.now_liked);
        assert_eq!(unliked.updated.like_count, 3);
        assert!(!unliked.updated.is_liked_by("u"));

        let entry = cache.get("p1").await.unwrap();
        assert_eq!(entry.like_count, 3);
        assert!(!entry.is_liked_by("u"));
    }

    #[tokio::test]
    async fn rapid_double_toggle_observes_local_state() {
        let cache = FeedCacheService::new(50);
        cache.replace_all(vec![post_with_id("p1", &[])]).await;

        // リモート確認を待たずに2回呼んでも、2回目は1回目の結果を反転する
        let first = cache.toggle_like("p1", "u").await.unwrap();
        let second = cache.toggle_like("p1", "u").await.unwrap();

        assert!(first.now_liked);
        assert!(!second.now_liked);
        assert_eq!(second.updated.like_count, 0);
    }

    #[tokio::test]
    async fn restore_replaces_patched_entry() {
        let cache = FeedCacheService::new(50);
        cache.replace_all(vec![post_with_id("p1", &[])]).await;

        let toggle = cache.toggle_like("p1", "u").await.unwrap();
        cache.restore(toggle.snapshot.clone()).await;

        assert_eq!(cache.get("p1").await.unwrap(), toggle.snapshot);
    }

    #[tokio::test]
    async fn toggle_like_on_unknown_post_is_none() {
        let cache = FeedCacheService::new(50);
        assert!(cache.toggle_like("missing", "u").await.is_none());
    }

    #[tokio::test]
    async fn anchor_roundtrip() {
        let cache = FeedCacheService::new(50);
        assert_eq!(cache.anchor().await.index(), 0);

        cache.save_anchor(7).await;
        assert_eq!(cache.anchor().await.index(), 7);
    }
}
