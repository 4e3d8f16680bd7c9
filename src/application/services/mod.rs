pub mod auth_service;
pub mod feed_service;
pub mod interaction_service;
pub mod post_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use feed_service::{FeedService, SyncOutcome};
pub use interaction_service::InteractionService;
pub use post_service::PostService;
pub use user_service::UserService;
