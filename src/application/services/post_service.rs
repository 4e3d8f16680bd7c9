use crate::application::ports::auth_provider::AuthProvider;
use crate::application::ports::image_processor::EncodedAttachment;
use crate::application::ports::post_store::{PostDocument, PostPatch, RemotePostStore};
use crate::domain::entities::Post;
use crate::domain::value_objects::Caption;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

/// 表示名が未設定のユーザーの投稿者名
const ANONYMOUS_USERNAME: &str = "Anonymous";

/// 投稿作成パイプライン。
///
/// キャプション検証 → セッション確認 → ドキュメント作成 →
/// 採番IDの書き戻し、の順で進み、検証に落ちた時点で
/// リモート呼び出しは一切発生しない。
pub struct PostService {
    store: Arc<dyn RemotePostStore>,
    auth: Arc<dyn AuthProvider>,
}

impl PostService {
    pub fn new(store: Arc<dyn RemotePostStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { store, auth }
    }

    pub async fn create_post(
        &self,
        caption_raw: &str,
        attachment: Option<EncodedAttachment>,
    ) -> Result<Post, AppError> {
        let caption = Caption::parse(caption_raw)?;

        let session = self
            .auth
            .current_user()
            .await
            .ok_or_else(|| AppError::NotAuthenticated("sign in to create a post".into()))?;
        let username = session
            .display_name
            .unwrap_or_else(|| ANONYMOUS_USERNAME.to_string());

        let mut post = Post::new(session.user_id, username, caption.as_str().to_string());
        post.set_image(attachment.map(|a| a.base64));

        let document = PostDocument::from(&post);
        let post_id = self.store.create_post(&document).await?;
        // 採番されたIDをドキュメント自身にも書き戻す（ストア側の検索用）
        self.store
            .update_post(&post_id, PostPatch::AssignPostId(post_id.clone()))
            .await?;
        post.assign_id(post_id);

        info!(
            post_id = post.post_id.as_deref().unwrap_or(""),
            has_image = post.has_image,
            "post created"
        );
        Ok(post)
    }
}
