use crate::domain::value_objects::ScrollDirective;
use async_trait::async_trait;

/// プレゼンテーション層（外部コラボレータ）への通知ポート。
///
/// `apply_scroll` はレイアウト完了後の次のレンダーパスで適用される契約。
/// エンジン側では遅延を持たない。
#[async_trait]
pub trait FeedPresenter: Send + Sync {
    /// 同期完了。count == 0 は「まだ投稿がない」表示に対応する。
    async fn feed_loaded(&self, count: usize);

    async fn apply_scroll(&self, directive: ScrollDirective);

    /// 回復可能なエラーの通知（一時的なメッセージ表示）
    async fn notify_error(&self, message: &str);

    /// 楽観的ないいねがリモート失敗で巻き戻されたことの通知
    async fn like_rolled_back(&self, post_id: &str);
}
