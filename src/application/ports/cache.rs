use crate::domain::entities::Post;
use crate::domain::value_objects::ScrollAnchor;
use async_trait::async_trait;

/// いいねトグルの結果。ロールバック用のスナップショットを含む。
#[derive(Debug, Clone)]
pub struct LikeToggle {
    /// トグル適用前のエントリ
    pub snapshot: Post,
    /// トグル適用後のエントリ
    pub updated: Post,
    /// トグル後に「いいね済み」になったか
    pub now_liked: bool,
}

/// 表示中フィードのキャッシュポート
#[async_trait]
pub trait FeedCache: Send + Sync {
    /// キャッシュ全体を置き換え、保持された件数を返す
    async fn replace_all(&self, posts: Vec<Post>) -> usize;

    /// 表示順（createdAt 降順）のエントリ一覧
    async fn entries(&self) -> Vec<Post>;

    /// ID でエントリを検索
    async fn get(&self, post_id: &str) -> Option<Post>;

    async fn len(&self) -> usize;

    /// いいねトグルを単一ロック内で適用する。
    /// 直前のトグル結果を観測した上で反転するため、連打しても二重加算しない。
    async fn toggle_like(&self, post_id: &str, user_id: &str) -> Option<LikeToggle>;

    /// リモート更新失敗時にトグル前のスナップショットへ戻す
    async fn restore(&self, snapshot: Post);

    /// ビューポート先頭エントリの添字を記録
    async fn save_anchor(&self, index: usize);

    async fn anchor(&self) -> ScrollAnchor;
}
