//! In-memory collaborator implementations
//!
//! These back the gate and feed logic in tests and local development where
//! Postgres and Redis are not available. They honor the same per-pair
//! atomicity contract as the real store (a single lock guards each mutation).

use crate::core::seed::PairKey;
use crate::models::{ChatMessage, MatchRecord, UserAttributes};
use crate::services::classifier::{ClassifierError, LeakClassifier};
use crate::services::live::{LiveChannel, LiveError, LiveEvent};
use crate::services::store::{LikeResult, MatchStore, ProfileStore, StoreError};
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct MemoryState {
    matches: HashMap<(String, String), MatchRecord>,
    messages: Vec<ChatMessage>,
}

/// In-memory match store
#[derive(Default)]
pub struct InMemoryMatchStore {
    state: Mutex<MemoryState>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key_tuple(key: &PairKey) -> (String, String) {
    (key.lo.clone(), key.hi.clone())
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn like(&self, key: &PairKey, initiator: &str) -> Result<LikeResult, StoreError> {
        let mut state = self.state.lock().await;

        match state.matches.entry(key_tuple(key)) {
            Entry::Vacant(vacant) => {
                let record = MatchRecord {
                    pair_lo: key.lo.clone(),
                    pair_hi: key.hi.clone(),
                    initiator: initiator.to_string(),
                    mutual: false,
                    unlocked: false,
                    accepted_lo: false,
                    accepted_hi: false,
                    created_at: chrono::Utc::now(),
                };
                vacant.insert(record.clone());
                Ok(LikeResult {
                    record,
                    newly_mutual: false,
                })
            }
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if !record.mutual && record.initiator != initiator {
                    record.mutual = true;
                    Ok(LikeResult {
                        record: record.clone(),
                        newly_mutual: true,
                    })
                } else {
                    Ok(LikeResult {
                        record: record.clone(),
                        newly_mutual: false,
                    })
                }
            }
        }
    }

    async fn get(&self, key: &PairKey) -> Result<Option<MatchRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.matches.get(&key_tuple(key)).cloned())
    }

    async fn accept(&self, key: &PairKey, user: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let record = state
            .matches
            .get_mut(&key_tuple(key))
            .ok_or_else(|| StoreError::NotFound(format!("pair ({}, {})", key.lo, key.hi)))?;

        if user == record.pair_lo {
            record.accepted_lo = true;
        } else if user == record.pair_hi {
            record.accepted_hi = true;
        }
        Ok(())
    }

    async fn set_unlocked(&self, key: &PairKey) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let record = state
            .matches
            .get_mut(&key_tuple(key))
            .ok_or_else(|| StoreError::NotFound(format!("pair ({}, {})", key.lo, key.hi)))?;
        record.unlocked = true;
        Ok(())
    }

    async fn accepted_count(&self, user: &str) -> Result<u32, StoreError> {
        let state = self.state.lock().await;
        let count = state
            .matches
            .values()
            .filter(|r| r.mutual && r.accepted_by(user))
            .count();
        Ok(count as u32)
    }

    async fn dissolve(&self, key: &PairKey) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.matches.remove(&key_tuple(key));
        state
            .messages
            .retain(|m| !(m.pair_lo == key.lo && m.pair_hi == key.hi));
        Ok(())
    }

    async fn insert_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.messages.push(message.clone());
        Ok(())
    }

    async fn history(&self, key: &PairKey) -> Result<Vec<ChatMessage>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .iter()
            .filter(|m| m.pair_lo == key.lo && m.pair_hi == key.hi)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// In-memory profile store
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<String, UserAttributes>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, identity: &str, attributes: UserAttributes) {
        let mut profiles = self.profiles.lock().await;
        profiles.insert(crate::core::seed::normalize_identity(identity), attributes);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get(&self, identity: &str) -> Result<Option<UserAttributes>, StoreError> {
        let profiles = self.profiles.lock().await;
        Ok(profiles.get(identity).cloned())
    }

    async fn list_candidates(
        &self,
        exclude: &str,
    ) -> Result<Vec<(String, UserAttributes)>, StoreError> {
        let profiles = self.profiles.lock().await;
        let mut candidates: Vec<(String, UserAttributes)> = profiles
            .iter()
            .filter(|(identity, _)| identity.as_str() != exclude)
            .map(|(identity, attrs)| (identity.clone(), attrs.clone()))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(candidates)
    }
}

/// Live channel that records published events instead of delivering them
#[derive(Default)]
pub struct RecordingLiveChannel {
    events: Mutex<Vec<(String, LiveEvent)>>,
}

impl RecordingLiveChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<(String, LiveEvent)> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl LiveChannel for RecordingLiveChannel {
    async fn publish(&self, identity: &str, event: &LiveEvent) -> Result<(), LiveError> {
        let mut events = self.events.lock().await;
        events.push((identity.to_string(), event.clone()));
        Ok(())
    }
}

/// Substring-based classifier: flags text containing any configured needle
pub struct KeywordLeakClassifier {
    needles: Vec<String>,
}

impl KeywordLeakClassifier {
    pub fn new(needles: &[&str]) -> Self {
        Self {
            needles: needles.iter().map(|n| n.to_string()).collect(),
        }
    }
}

#[async_trait]
impl LeakClassifier for KeywordLeakClassifier {
    async fn classify_leak(&self, text: &str) -> Result<bool, ClassifierError> {
        Ok(self.needles.iter().any(|n| text.contains(n.as_str())))
    }
}
