// Service exports
pub mod cache;
pub mod classifier;
pub mod live;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use classifier::{ClassifierError, HttpLeakClassifier, LeakClassifier};
pub use live::{LiveChannel, LiveError, LiveEvent, RedisLiveChannel};
pub use memory::{InMemoryMatchStore, InMemoryProfileStore, KeywordLeakClassifier, RecordingLiveChannel};
pub use postgres::{connect_pool, PostgresMatchStore, PostgresProfileStore};
pub use store::{LikeResult, MatchStore, ProfileStore, StoreError};
