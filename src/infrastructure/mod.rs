pub mod clock;
pub mod memory_store;
pub mod redis_store;
pub mod store;

pub use clock::*;
pub use memory_store::*;
pub use redis_store::*;
pub use store::*;
