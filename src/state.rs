use crate::application::ports::auth_provider::AuthProvider;
use crate::application::ports::cache::FeedCache;
use crate::application::ports::feed_presenter::FeedPresenter;
use crate::application::ports::post_store::RemotePostStore;
use crate::application::services::{
    AuthService, FeedService, InteractionService, PostService, UserService,
};
use crate::infrastructure::auth::MemoryAuthProvider;
use crate::infrastructure::cache::FeedCacheService;
use crate::infrastructure::media::{AttachmentEncoder, AttachmentProcessor};
use crate::infrastructure::store::MemoryPostStore;
use crate::shared::config::AppConfig;
use std::sync::Arc;

/// アプリ全体の依存グラフ。
///
/// 外部コラボレータ（ストア・認証・プレゼンタ）を注入し、
/// サービス群を一度だけ束ねて共有する。
pub struct AppState {
    pub config: AppConfig,
    pub auth_service: Arc<AuthService>,
    pub feed_service: Arc<FeedService>,
    pub interaction_service: Arc<InteractionService>,
    pub post_service: Arc<PostService>,
    pub user_service: Arc<UserService>,
    pub attachment_encoder: Arc<AttachmentEncoder>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RemotePostStore>,
        auth: Arc<dyn AuthProvider>,
        presenter: Arc<dyn FeedPresenter>,
    ) -> Self {
        let cache: Arc<dyn FeedCache> = Arc::new(FeedCacheService::new(config.feed.page_size));

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&auth),
            Arc::clone(&store),
            config.auth.clone(),
        ));
        let feed_service = Arc::new(FeedService::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            Arc::clone(&presenter),
            config.feed.page_size,
        ));
        let interaction_service = Arc::new(InteractionService::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            Arc::clone(&presenter),
        ));
        let post_service = Arc::new(PostService::new(Arc::clone(&store), Arc::clone(&auth)));
        let user_service = Arc::new(UserService::new(Arc::clone(&store)));

        let processor = Arc::new(AttachmentProcessor::new(config.media.clone()));
        let attachment_encoder = Arc::new(AttachmentEncoder::new(processor));

        Self {
            config,
            auth_service,
            feed_service,
            interaction_service,
            post_service,
            user_service,
            attachment_encoder,
        }
    }

    /// インメモリのコラボレータで組み立てる（デモおよび統合テスト用）
    pub fn new_in_memory(config: AppConfig, presenter: Arc<dyn FeedPresenter>) -> Self {
        let store = Arc::new(MemoryPostStore::new());
        let auth = Arc::new(MemoryAuthProvider::new());
        Self::new(config, store, auth, presenter)
    }
}
