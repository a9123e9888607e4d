use crate::models::ChatMessage;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when publishing to the live channel
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Event pushed to a user's live connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    Message { message: ChatMessage },
    MatchFormed { with: String },
    BondDissolved { with: String },
}

/// Best-effort fan-out to live connections
///
/// Delivery is at-most-once: there is no redelivery and no offline queue
/// beyond the persisted message history a client re-fetches on reconnect.
#[async_trait]
pub trait LiveChannel: Send + Sync {
    async fn publish(&self, identity: &str, event: &LiveEvent) -> Result<(), LiveError>;
}

/// Redis pub/sub implementation of the live channel
pub struct RedisLiveChannel {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
}

impl RedisLiveChannel {
    pub async fn new(redis_url: &str) -> Result<Self, LiveError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
        })
    }

    fn channel(identity: &str) -> String {
        format!("live:{}", identity)
    }
}

#[async_trait]
impl LiveChannel for RedisLiveChannel {
    async fn publish(&self, identity: &str, event: &LiveEvent) -> Result<(), LiveError> {
        let payload = serde_json::to_string(event)?;
        let mut conn = self.redis.lock().await;
        let _: () = redis::cmd("PUBLISH")
            .arg(Self::channel(identity))
            .arg(payload)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Published live event to {}", identity);
        Ok(())
    }
}
