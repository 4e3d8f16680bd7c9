use crate::domain::entities::{Post, User};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// リモートストアに永続化される投稿ドキュメント。
///
/// フィールド名はストア上のレイアウトと一対一。欠けているフィールドは
/// serde の default 規則で補う（スキーマレスなストアからのハイドレーション
/// をリフレクションなしで行うため）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostDocument {
    #[serde(default)]
    pub post_id: Option<String>,
    pub user_id: String,
    pub username: String,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub liked_by: HashMap<String, bool>,
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        Self {
            post_id: post.post_id.clone(),
            user_id: post.user_id.clone(),
            username: post.username.clone(),
            caption: post.caption.clone(),
            image_base64: post.image_base64.clone(),
            has_image: post.has_image,
            created_at: post.created_at,
            like_count: post.like_count,
            comment_count: post.comment_count,
            liked_by: post.liked_by.clone(),
        }
    }
}

impl From<PostDocument> for Post {
    fn from(doc: PostDocument) -> Self {
        Self {
            post_id: doc.post_id,
            user_id: doc.user_id,
            username: doc.username,
            caption: doc.caption,
            image_base64: doc.image_base64,
            has_image: doc.has_image,
            created_at: doc.created_at,
            like_count: doc.like_count,
            comment_count: doc.comment_count,
            liked_by: doc.liked_by,
        }
    }
}

/// likedBy マップへの部分更新。`Delete` はストア側のフィールドパス削除に対応する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikedByOp {
    Set(String),
    Delete(String),
}

/// 単一ドキュメントに対する部分更新。
#[derive(Debug, Clone, PartialEq)]
pub enum PostPatch {
    /// 採番されたIDをドキュメント自身に書き戻す
    AssignPostId(String),
    /// いいねトグルの差分。カウンタは絶対値で送る（クライアント観測値）。
    /// 複数クライアントの同時トグルで likedBy と乖離しうる点はストアの
    /// 原子性保証に依存する。
    Like { like_count: u32, op: LikedByOp },
}

/// リモートのドキュメントストア（外部コラボレータ）
#[async_trait]
pub trait RemotePostStore: Send + Sync {
    /// createdAt 降順で直近の投稿を取得
    async fn query_recent(&self, limit: usize) -> Result<Vec<Post>, AppError>;

    /// 投稿を作成し、採番されたIDを返す
    async fn create_post(&self, document: &PostDocument) -> Result<String, AppError>;

    /// 単一投稿への部分更新
    async fn update_post(&self, post_id: &str, patch: PostPatch) -> Result<(), AppError>;

    /// ユーザープロフィールの取得
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// ユーザープロフィールの作成（登録時）
    async fn create_user(&self, user: &User) -> Result<(), AppError>;
}
