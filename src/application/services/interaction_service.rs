use crate::application::ports::cache::FeedCache;
use crate::application::ports::feed_presenter::FeedPresenter;
use crate::application::ports::post_store::{LikedByOp, PostPatch, RemotePostStore};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, warn};

/// いいねトグルの楽観的適用。
///
/// キャッシュを先に書き換えてからリモートへパッチを送る。
/// リモート側が失敗した場合はトグル前のスナップショットへ巻き戻し、
/// プレゼンタへロールバックを通知する。
pub struct InteractionService {
    store: Arc<dyn RemotePostStore>,
    cache: Arc<dyn FeedCache>,
    presenter: Arc<dyn FeedPresenter>,
}

impl InteractionService {
    pub fn new(
        store: Arc<dyn RemotePostStore>,
        cache: Arc<dyn FeedCache>,
        presenter: Arc<dyn FeedPresenter>,
    ) -> Self {
        Self {
            store,
            cache,
            presenter,
        }
    }

    /// `acting_user_id` による `post_id` のいいね状態を反転する。
    /// 戻り値はトグル後の「いいね済み」状態。
    pub async fn toggle_like(&self, post_id: &str, acting_user_id: &str) -> Result<bool, AppError> {
        let toggle = self
            .cache
            .toggle_like(post_id, acting_user_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("post not in feed: {post_id}")))?;

        debug!(
            post_id,
            now_liked = toggle.now_liked,
            like_count = toggle.updated.like_count,
            "optimistic like applied"
        );

        let op = if toggle.now_liked {
            LikedByOp::Set(acting_user_id.to_string())
        } else {
            LikedByOp::Delete(acting_user_id.to_string())
        };
        let patch = PostPatch::Like {
            like_count: toggle.updated.like_count,
            op,
        };

        if let Err(err) = self.store.update_post(post_id, patch).await {
            warn!(post_id, "like update failed, rolling back: {err}");
            self.cache.restore(toggle.snapshot).await;
            self.presenter.like_rolled_back(post_id).await;
            return Err(err);
        }

        Ok(toggle.now_liked)
    }
}
