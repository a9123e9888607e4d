use crate::core::seed::PairKey;
use crate::models::{ChatMessage, MatchRecord, UserAttributes};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur in the persistent store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Result of a like operation after the transactional transition
#[derive(Debug, Clone)]
pub struct LikeResult {
    pub record: MatchRecord,
    /// True only on the transition OneSidedLike -> Mutual, not on replays
    pub newly_mutual: bool,
}

/// Persistent store for match records and chat messages
///
/// Every mutation is a single atomic transaction scoped to one pair or one
/// message. The like transition in particular must lock the pair row so two
/// concurrent likes cannot both observe "no record".
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Record a like from `initiator` (normalized), creating or upgrading
    /// the pair record. Idempotent for repeated likes from the same side.
    async fn like(&self, key: &PairKey, initiator: &str) -> Result<LikeResult, StoreError>;

    async fn get(&self, key: &PairKey) -> Result<Option<MatchRecord>, StoreError>;

    /// Mark the given (normalized) user's side of the pair as accepted
    async fn accept(&self, key: &PairKey, user: &str) -> Result<(), StoreError>;

    /// Set the paid-bypass flag on the pair
    async fn set_unlocked(&self, key: &PairKey) -> Result<(), StoreError>;

    /// Number of mutual matches the user currently has accepted
    async fn accepted_count(&self, user: &str) -> Result<u32, StoreError>;

    /// Hard-delete the pair record and its message history
    async fn dissolve(&self, key: &PairKey) -> Result<(), StoreError>;

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), StoreError>;

    async fn history(&self, key: &PairKey) -> Result<Vec<ChatMessage>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Read-only access to user profile attributes
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch attributes for a normalized identity
    async fn get(&self, identity: &str) -> Result<Option<UserAttributes>, StoreError>;

    /// All candidate profiles except the given identity
    async fn list_candidates(
        &self,
        exclude: &str,
    ) -> Result<Vec<(String, UserAttributes)>, StoreError>;
}
