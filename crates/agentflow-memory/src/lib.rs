pub mod bounded;
pub mod compression;
pub mod error;
pub mod redis_store;
pub mod store;
pub mod summarizer;

pub use bounded::{BoundedMemoryStore, MemoryConfig};
pub use compression::{Compressor, IdentityCompressor};
pub use error::{MemoryError, Result};
pub use redis_store::{RedisMemoryConfig, RedisMemoryStore, RetryConfig, SummarizationConfig};
pub use store::{MemoryStatistics, MemoryStore};
pub use summarizer::{Summarizer, SUMMARIZATION_INSTRUCTION};
