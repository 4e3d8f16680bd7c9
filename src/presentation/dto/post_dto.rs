use crate::domain::entities::Post;
use serde::{Deserialize, Serialize};

/// フィード1行分の表示モデル。
///
/// エンティティと違い、閲覧者視点の派生値（`liked_by_me`、相対時刻）を
/// 焼き込んだ形でビューへ渡す。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDto {
    pub post_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub caption: String,
    pub image_base64: Option<String>,
    pub has_image: bool,
    pub like_count: u32,
    pub comment_count: u32,
    pub liked_by_me: bool,
    pub time_ago: String,
}

impl PostDto {
    pub fn from_post(post: &Post, viewer_id: &str, now_millis: i64) -> Self {
        Self {
            post_id: post.post_id.clone(),
            user_id: post.user_id.clone(),
            username: post.username.clone(),
            caption: post.caption.clone(),
            image_base64: post.image_base64.clone(),
            has_image: post.has_image,
            like_count: post.like_count,
            comment_count: post.comment_count,
            liked_by_me: post.is_liked_by(viewer_id),
            time_ago: time_ago(post.created_at, now_millis),
        }
    }
}

/// 投稿時刻の相対表記。粒度は分・時・日で打ち切る。
/// タイムスタンプ未採番（永続化前）や時計のずれで未来になった場合は "Just now"。
pub fn time_ago(created_at: Option<i64>, now_millis: i64) -> String {
    let Some(created) = created_at else {
        return "Just now".to_string();
    };
    let elapsed_ms = now_millis.saturating_sub(created);
    if elapsed_ms < 0 {
        return "Just now".to_string();
    }

    let minutes = elapsed_ms / 60_000;
    let hours = elapsed_ms / 3_600_000;
    let days = elapsed_ms / 86_400_000;

    if minutes < 1 {
        "Just now".to_string()
    } else if hours < 1 {
        format!("{minutes}m ago")
    } else if days < 1 {
        format!("{hours}h ago")
    } else {
        format!("{days}d ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn time_ago_buckets() {
        assert_eq!(time_ago(Some(NOW - 30_000), NOW), "Just now");
        assert_eq!(time_ago(Some(NOW - 5 * 60_000), NOW), "5m ago");
        assert_eq!(time_ago(Some(NOW - 3 * 3_600_000), NOW), "3h ago");
        assert_eq!(time_ago(Some(NOW - 2 * 86_400_000), NOW), "2d ago");
    }

    #[test]
    fn missing_or_future_timestamp_is_just_now() {
        assert_eq!(time_ago(None, NOW), "Just now");
        assert_eq!(time_ago(Some(NOW + 60_000), NOW), "Just now");
    }

    #[test]
    fn dto_reflects_viewer_like_state() {
        let mut post = Post::new("author".into(), "alice".into(), "splash".into());
        post.post_id = Some("p1".into());
        post.created_at = Some(NOW - 10 * 60_000);
        post.apply_like("viewer");

        let dto = PostDto::from_post(&post, "viewer", NOW);
        assert!(dto.liked_by_me);
        assert_eq!(dto.like_count, 1);
        assert_eq!(dto.time_ago, "10m ago");

        let other = PostDto::from_post(&post, "someone-else", NOW);
        assert!(!other.liked_by_me);
    }
}
