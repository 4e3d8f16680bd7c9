pub mod auth_provider;
pub mod cache;
pub mod feed_presenter;
pub mod image_processor;
pub mod post_store;

pub use auth_provider::{AuthProvider, AuthUser};
pub use cache::{FeedCache, LikeToggle};
pub use feed_presenter::FeedPresenter;
pub use image_processor::{EncodedAttachment, ImageProcessor};
pub use post_store::{LikedByOp, PostDocument, PostPatch, RemotePostStore};
