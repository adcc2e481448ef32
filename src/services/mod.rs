mod store;
mod memory_store;
mod redis_store;
pub mod export;
pub mod transition;

pub use store::{seed_accounts, TaskStore};
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
