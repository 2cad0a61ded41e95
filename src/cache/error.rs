use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {message}")]
    Unavailable { message: String },
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("cache operation exceeded {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("cache payload could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
