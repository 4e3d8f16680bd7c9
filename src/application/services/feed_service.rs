use crate::application::ports::cache::FeedCache;
use crate::application::ports::feed_presenter::FeedPresenter;
use crate::application::ports::post_store::RemotePostStore;
use crate::domain::value_objects::ScrollDirective;
use crate::shared::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `synchronize` の結果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// キャッシュを差し替え、この件数を読み込んだ
    Loaded(usize),
    /// 同期が既に進行中のため no-op として扱われた
    AlreadyLoading,
}

/// フィード同期のオーケストレータ。
///
/// リモートストアから直近ページを取得してキャッシュを丸ごと差し替え、
/// 読み込み件数とスクロール指示をプレゼンタへ通知する。
/// 同時再入はしない: 進行中の呼び出しがあれば重複呼び出しは
/// 即座に `AlreadyLoading` を返す（キューイングもリトライもしない）。
pub struct FeedService {
    store: Arc<dyn RemotePostStore>,
    cache: Arc<dyn FeedCache>,
    presenter: Arc<dyn FeedPresenter>,
    page_size: usize,
    loading: AtomicBool,
    first_load: AtomicBool,
}

impl FeedService {
    pub fn new(
        store: Arc<dyn RemotePostStore>,
        cache: Arc<dyn FeedCache>,
        presenter: Arc<dyn FeedPresenter>,
        page_size: usize,
    ) -> Self {
        Self {
            store,
            cache,
            presenter,
            page_size,
            loading: AtomicBool::new(false),
            first_load: AtomicBool::new(true),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// ビューポートが静止したときに呼ばれ、先頭可視エントリの添字を記録する
    pub async fn record_scroll(&self, index: usize) {
        self.cache.save_anchor(index).await;
    }

    pub async fn synchronize(&self) -> Result<SyncOutcome, AppError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("synchronize already in flight, ignoring duplicate call");
            return Ok(SyncOutcome::AlreadyLoading);
        }

        let outcome = self.run_cycle().await;
        self.loading.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_cycle(&self) -> Result<SyncOutcome, AppError> {
        let posts = match self.store.query_recent(self.page_size).await {
            Ok(posts) => posts,
            Err(err) => {
                // 失敗時は既存キャッシュを一切触らない（fail-soft）
                warn!("feed synchronization failed: {err}");
                self.presenter
                    .notify_error(&format!("Failed to load posts: {err}"))
                    .await;
                return Err(err);
            }
        };

        let count = self.cache.replace_all(posts).await;
        // 初回ロードのフラグは成功したサイクルでのみ消費する
        let first_load = self.first_load.swap(false, Ordering::SeqCst);
        let directive = if first_load {
            if count > 0 {
                ScrollDirective::ToTop
            } else {
                ScrollDirective::None
            }
        } else {
            match self.cache.anchor().await.clamp(count) {
                Some(index) => ScrollDirective::ToIndex(index),
                None => ScrollDirective::None,
            }
        };

        self.presenter.feed_loaded(count).await;
        self.presenter.apply_scroll(directive).await;
        info!("feed synchronized: {count} posts loaded");
        Ok(SyncOutcome::Loaded(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::post_store::{PostDocument, PostPatch};
    use crate::domain::entities::{Post, User};
    use crate::infrastructure::cache::FeedCacheService;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::{Mutex, Notify};

    #[derive(Default)]
    struct TestPresenter {
        loaded: Mutex<Vec<usize>>,
        scrolls: Mutex<Vec<ScrollDirective>>,
        errors: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FeedPresenter for TestPresenter {
        async fn feed_loaded(&self, count: usize) {
            self.loaded.lock().await.push(count);
        }
        async fn apply_scroll(&self, directive: ScrollDirective) {
            self.scrolls.lock().await.push(directive);
        }
        async fn notify_error(&self, message: &str) {
            self.errors.lock().await.push(message.to_string());
        }
        async fn like_rolled_back(&self, _post_id: &str) {}
    }

    struct TestStore {
        posts: Mutex<Vec<Post>>,
        fail: AtomicBool,
        query_count: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl TestStore {
        fn with_posts(posts: Vec<Post>) -> Self {
            Self {
                posts: Mutex::new(posts),
                fail: AtomicBool::new(false),
                query_count: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(posts: Vec<Post>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::with_posts(posts)
            }
        }

        fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        async fn set_posts(&self, posts: Vec<Post>) {
            *self.posts.lock().await = posts;
        }

        fn queries(&self) -> usize {
            self.query_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemotePostStore for TestStore {
        async fn query_recent(&self, limit: usize) -> Result<Vec<Post>, AppError> {
            self.query_count.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Network("connection reset".into()));
            }
            let posts = self.posts.lock().await.clone();
            Ok(posts.into_iter().take(limit).collect())
        }

        async fn create_post(&self, _document: &PostDocument) -> Result<String, AppError> {
            unreachable!("feed tests never create posts")
        }

        async fn update_post(&self, _post_id: &str, _patch: PostPatch) -> Result<(), AppError> {
            unreachable!("feed tests never update posts")
        }

        async fn get_user(&self, _user_id: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }

        async fn create_user(&self, _user: &User) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn sample_posts(count: usize) -> Vec<Post> {
        (0..count)
            .map(|i| {
                let mut post = Post::new("u1".into(), "alice".into(), format!("post-{i}"));
                post.post_id = Some(format!("p{i}"));
                // createdAt 降順で返すストアを模す
                post.created_at = Some(1_000_000 - i as i64);
                post
            })
            .collect()
    }

    fn service(
        store: Arc<TestStore>,
        cache: Arc<FeedCacheService>,
        presenter: Arc<TestPresenter>,
    ) -> FeedService {
        FeedService::new(store, cache, presenter, 50)
    }

    #[tokio::test]
    async fn first_load_replaces_cache_and_scrolls_to_top() {
        let store = Arc::new(TestStore::with_posts(sample_posts(3)));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = service(store, cache.clone(), presenter.clone());

        let outcome = feed.synchronize().await.unwrap();
        assert_eq!(outcome, SyncOutcome::Loaded(3));

        let entries = cache.entries().await;
        assert_eq!(entries.len(), 3);
        // createdAt 降順（非増加）であること
        for pair in entries.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }

        assert_eq!(*presenter.loaded.lock().await, vec![3]);
        assert_eq!(*presenter.scrolls.lock().await, vec![ScrollDirective::ToTop]);
    }

    #[tokio::test]
    async fn empty_store_yields_empty_feed_not_error() {
        let store = Arc::new(TestStore::with_posts(Vec::new()));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = service(store, cache.clone(), presenter.clone());

        let outcome = feed.synchronize().await.unwrap();
        assert_eq!(outcome, SyncOutcome::Loaded(0));
        assert_eq!(cache.len().await, 0);

        // 「まだ投稿がない」シグナルはエラーではなく件数0として届く
        assert_eq!(*presenter.loaded.lock().await, vec![0]);
        assert!(presenter.errors.lock().await.is_empty());
        assert_eq!(*presenter.scrolls.lock().await, vec![ScrollDirective::None]);
    }

    #[tokio::test]
    async fn refresh_restores_saved_anchor() {
        let store = Arc::new(TestStore::with_posts(sample_posts(10)));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = service(store, cache, presenter.clone());

        feed.synchronize().await.unwrap();
        feed.record_scroll(4).await;
        feed.synchronize().await.unwrap();

        let scrolls = presenter.scrolls.lock().await;
        assert_eq!(scrolls[1], ScrollDirective::ToIndex(4));
    }

    #[tokio::test]
    async fn anchor_beyond_new_length_clamps_to_last_index() {
        let store = Arc::new(TestStore::with_posts(sample_posts(10)));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = service(store.clone(), cache, presenter.clone());

        feed.synchronize().await.unwrap();
        feed.record_scroll(8).await;

        // リフレッシュでフィードが縮んだ
        store.set_posts(sample_posts(3)).await;
        feed.synchronize().await.unwrap();

        let scrolls = presenter.scrolls.lock().await;
        assert_eq!(scrolls[1], ScrollDirective::ToIndex(2));
    }

    #[tokio::test]
    async fn anchor_restore_on_emptied_feed_is_noop() {
        let store = Arc::new(TestStore::with_posts(sample_posts(5)));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = service(store.clone(), cache, presenter.clone());

        feed.synchronize().await.unwrap();
        feed.record_scroll(2).await;

        store.set_posts(Vec::new()).await;
        feed.synchronize().await.unwrap();

        let scrolls = presenter.scrolls.lock().await;
        assert_eq!(scrolls[1], ScrollDirective::None);
    }

    #[tokio::test]
    async fn duplicate_synchronize_is_a_noop_with_one_query() {
        let gate = Arc::new(Notify::new());
        let store = Arc::new(TestStore::gated(sample_posts(2), gate.clone()));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = Arc::new(service(store.clone(), cache, presenter));

        let first = {
            let feed = Arc::clone(&feed);
            tokio::spawn(async move { feed.synchronize().await })
        };

        // 1回目がストア応答待ちになるまで待つ
        while !feed.is_loading() {
            tokio::task::yield_now().await;
        }

        let duplicate = feed.synchronize().await.unwrap();
        assert_eq!(duplicate, SyncOutcome::AlreadyLoading);

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome, SyncOutcome::Loaded(2));
        assert_eq!(store.queries(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_leaves_previous_feed_visible() {
        let store = Arc::new(TestStore::with_posts(sample_posts(3)));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = service(store.clone(), cache.clone(), presenter.clone());

        feed.synchronize().await.unwrap();

        store.set_fail(true);
        let err = feed.synchronize().await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));

        // 前の内容はそのまま、エラーは通知される
        assert_eq!(cache.len().await, 3);
        assert_eq!(presenter.errors.lock().await.len(), 1);
        assert_eq!(presenter.loaded.lock().await.len(), 1);

        // ガードは解放されており、次の同期は通る
        store.set_fail(false);
        assert_eq!(feed.synchronize().await.unwrap(), SyncOutcome::Loaded(3));
    }

    #[tokio::test]
    async fn failed_first_load_keeps_scroll_to_top_for_next_success() {
        let store = Arc::new(TestStore::with_posts(sample_posts(3)));
        let cache = Arc::new(FeedCacheService::new(50));
        let presenter = Arc::new(TestPresenter::default());
        let feed = service(store.clone(), cache, presenter.clone());

        store.set_fail(true);
        feed.synchronize().await.unwrap_err();

        store.set_fail(false);
        feed.synchronize().await.unwrap();

        // 最初に成功したロードが「初回」としてトップへスクロールする
        assert_eq!(*presenter.scrolls.lock().await, vec![ScrollDirective::ToTop]);
    }
}
