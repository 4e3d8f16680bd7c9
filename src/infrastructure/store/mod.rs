pub mod memory_post_store;

pub use memory_post_store::MemoryPostStore;
