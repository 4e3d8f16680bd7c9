pub mod memory_auth_provider;

pub use memory_auth_provider::MemoryAuthProvider;
