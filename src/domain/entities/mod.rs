pub mod post;
pub mod user;

pub use post::Post;
pub use user::{User, DEFAULT_PROFILE_IMAGE};
