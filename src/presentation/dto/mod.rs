pub mod post_dto;

pub use post_dto::PostDto;
