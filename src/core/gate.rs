use crate::core::seed::{normalize_identity, PairKey};
use crate::models::ChatMessage;
use crate::services::classifier::{ClassifierError, LeakClassifier};
use crate::services::live::{LiveChannel, LiveEvent};
use crate::services::store::{MatchStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by the match gate
///
/// All of these are recoverable at the request boundary; handlers map them
/// to distinct user-facing responses rather than generic failures.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("no mutual match between the pair")]
    NotMutual,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Result of a like action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    MutualMatch,
}

/// Result of accepting a pending chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted,
    /// The free-chat limit is reached and this match has no paid unlock;
    /// nothing was mutated.
    PaymentRequired,
}

/// Result of a message relay attempt on a mutual match
#[derive(Debug, Clone)]
pub enum RelayOutcome {
    Sent(ChatMessage),
    /// The message was flagged and the match dissolved
    Rejected { reason: &'static str },
}

/// Reason string attached to safety rejections
pub const REASON_CONTACT_INFO: &str = "contact_info_detected";

/// Like / mutual-match / chat gating over the collaborator seams
///
/// State machine per unordered pair: NoInteraction -> OneSidedLike on first
/// like, -> Mutual on the reverse like, -> Dissolved (record deleted) on a
/// detected safety violation. Dissolution is terminal: a later like starts
/// over from NoInteraction.
#[derive(Clone)]
pub struct MatchGate {
    store: Arc<dyn MatchStore>,
    classifier: Arc<dyn LeakClassifier>,
    live: Arc<dyn LiveChannel>,
    free_chat_limit: u32,
}

impl MatchGate {
    pub fn new(
        store: Arc<dyn MatchStore>,
        classifier: Arc<dyn LeakClassifier>,
        live: Arc<dyn LiveChannel>,
        free_chat_limit: u32,
    ) -> Self {
        Self {
            store,
            classifier,
            live,
            free_chat_limit,
        }
    }

    /// Record a like; idempotent for duplicate likes from the same side.
    /// The upgrade to mutual is detected from the existing reverse record,
    /// never via a separate confirm step.
    pub async fn like(&self, from: &str, to: &str) -> Result<LikeOutcome, GateError> {
        let key = PairKey::new(from, to);
        let initiator = normalize_identity(from);

        let result = self.store.like(&key, &initiator).await?;

        if result.newly_mutual {
            let other = key.other(&initiator).to_string();
            let event = LiveEvent::MatchFormed {
                with: initiator.clone(),
            };
            if let Err(e) = self.live.publish(&other, &event).await {
                tracing::warn!("Failed to publish match notification to {}: {}", other, e);
            }
        }

        Ok(if result.record.mutual {
            LikeOutcome::MutualMatch
        } else {
            LikeOutcome::Liked
        })
    }

    /// True iff a mutual record exists between the pair
    pub async fn can_send(&self, from: &str, to: &str) -> Result<bool, GateError> {
        let key = PairKey::new(from, to);
        let record = self.store.get(&key).await?;
        Ok(record.map(|r| r.mutual).unwrap_or(false))
    }

    /// Accept a pending chat with a matched user
    ///
    /// At most `free_chat_limit` concurrently accepted chats are free;
    /// accepting beyond that requires the pair's paid unlock and otherwise
    /// returns `PaymentRequired` with no state mutation.
    pub async fn accept(&self, user: &str, with: &str) -> Result<AcceptOutcome, GateError> {
        let key = PairKey::new(user, with);
        let me = normalize_identity(user);

        let record = self.store.get(&key).await?.ok_or(GateError::NotMutual)?;
        if !record.mutual {
            return Err(GateError::NotMutual);
        }

        if record.accepted_by(&me) {
            return Ok(AcceptOutcome::Accepted);
        }

        let accepted = self.store.accepted_count(&me).await?;
        if accepted >= self.free_chat_limit && !record.unlocked {
            return Ok(AcceptOutcome::PaymentRequired);
        }

        self.store.accept(&key, &me).await?;
        Ok(AcceptOutcome::Accepted)
    }

    /// Apply a paid unlock to a mutual match
    pub async fn unlock(&self, from: &str, to: &str) -> Result<(), GateError> {
        let key = PairKey::new(from, to);

        let record = self.store.get(&key).await?.ok_or(GateError::NotMutual)?;
        if !record.mutual {
            return Err(GateError::NotMutual);
        }

        self.store.set_unlocked(&key).await?;
        Ok(())
    }

    /// Scan and relay a chat message
    ///
    /// Unlocked pairs skip scanning. A flagged message dissolves the match
    /// (hard delete) and notifies the other party; the message is dropped.
    /// Clean messages are persisted, then published best-effort to the
    /// recipient's live channel.
    pub async fn check_and_relay(
        &self,
        from: &str,
        to: &str,
        content: &str,
    ) -> Result<RelayOutcome, GateError> {
        let key = PairKey::new(from, to);
        let sender = normalize_identity(from);

        let record = self.store.get(&key).await?.ok_or(GateError::NotMutual)?;
        if !record.mutual {
            return Err(GateError::NotMutual);
        }

        if !record.unlocked && self.classifier.classify_leak(content).await? {
            self.store.dissolve(&key).await?;

            let other = key.other(&sender).to_string();
            let event = LiveEvent::BondDissolved {
                with: sender.clone(),
            };
            if let Err(e) = self.live.publish(&other, &event).await {
                tracing::warn!("Failed to publish dissolution notice to {}: {}", other, e);
            }

            tracing::info!("Match ({}, {}) dissolved after flagged message", key.lo, key.hi);

            return Ok(RelayOutcome::Rejected {
                reason: REASON_CONTACT_INFO,
            });
        }

        let message = ChatMessage {
            id: uuid::Uuid::new_v4(),
            pair_lo: key.lo.clone(),
            pair_hi: key.hi.clone(),
            sender: sender.clone(),
            body: content.to_string(),
            sent_at: chrono::Utc::now(),
        };

        self.store.insert_message(&message).await?;

        let recipient = key.other(&sender).to_string();
        let event = LiveEvent::Message {
            message: message.clone(),
        };
        if let Err(e) = self.live.publish(&recipient, &event).await {
            tracing::warn!("Failed to relay message to {}: {}", recipient, e);
        }

        Ok(RelayOutcome::Sent(message))
    }

    /// Persisted message history for a mutual pair
    pub async fn history(&self, from: &str, to: &str) -> Result<Vec<ChatMessage>, GateError> {
        if !self.can_send(from, to).await? {
            return Err(GateError::NotMutual);
        }

        let key = PairKey::new(from, to);
        Ok(self.store.history(&key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::{InMemoryMatchStore, KeywordLeakClassifier, RecordingLiveChannel};

    fn gate_with(limit: u32) -> (MatchGate, Arc<RecordingLiveChannel>) {
        let live = Arc::new(RecordingLiveChannel::new());
        let gate = MatchGate::new(
            Arc::new(InMemoryMatchStore::new()),
            Arc::new(KeywordLeakClassifier::new(&["@"])),
            live.clone(),
            limit,
        );
        (gate, live)
    }

    #[tokio::test]
    async fn test_like_then_reverse_like_is_mutual() {
        let (gate, _) = gate_with(2);

        assert_eq!(gate.like("a@x", "b@x").await.unwrap(), LikeOutcome::Liked);
        assert_eq!(gate.like("b@x", "a@x").await.unwrap(), LikeOutcome::MutualMatch);
        assert!(gate.can_send("a@x", "b@x").await.unwrap());
        assert!(gate.can_send("b@x", "a@x").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_like_is_idempotent() {
        let (gate, _) = gate_with(2);

        assert_eq!(gate.like("a@x", "b@x").await.unwrap(), LikeOutcome::Liked);
        assert_eq!(gate.like("a@x", "b@x").await.unwrap(), LikeOutcome::Liked);
        assert!(!gate.can_send("a@x", "b@x").await.unwrap());
    }

    #[tokio::test]
    async fn test_can_send_false_without_record() {
        let (gate, _) = gate_with(2);
        assert!(!gate.can_send("a@x", "b@x").await.unwrap());
    }

    #[tokio::test]
    async fn test_relay_requires_mutual() {
        let (gate, _) = gate_with(2);
        gate.like("a@x", "b@x").await.unwrap();

        let result = gate.check_and_relay("a@x", "b@x", "hello").await;
        assert!(matches!(result, Err(GateError::NotMutual)));
    }

    #[tokio::test]
    async fn test_flagged_message_dissolves_match() {
        let (gate, live) = gate_with(2);
        gate.like("a@x", "b@x").await.unwrap();
        gate.like("b@x", "a@x").await.unwrap();

        let outcome = gate
            .check_and_relay("a@x", "b@x", "text me: me@mail.com")
            .await
            .unwrap();
        assert!(matches!(outcome, RelayOutcome::Rejected { reason } if reason == REASON_CONTACT_INFO));

        // Terminal and irrevocable until a fresh mutual like sequence
        assert!(!gate.can_send("a@x", "b@x").await.unwrap());
        assert_eq!(gate.like("a@x", "b@x").await.unwrap(), LikeOutcome::Liked);

        // The other party was notified out-of-band
        let events = live.events().await;
        assert!(events
            .iter()
            .any(|(who, e)| who == "b@x" && matches!(e, LiveEvent::BondDissolved { .. })));
    }

    #[tokio::test]
    async fn test_unlocked_match_skips_scanning() {
        let (gate, _) = gate_with(2);
        gate.like("a@x", "b@x").await.unwrap();
        gate.like("b@x", "a@x").await.unwrap();
        gate.unlock("a@x", "b@x").await.unwrap();

        let outcome = gate
            .check_and_relay("a@x", "b@x", "text me: me@mail.com")
            .await
            .unwrap();
        assert!(matches!(outcome, RelayOutcome::Sent(_)));
        assert!(gate.can_send("a@x", "b@x").await.unwrap());
    }

    #[tokio::test]
    async fn test_third_accept_requires_payment() {
        let (gate, _) = gate_with(2);

        for other in ["b@x", "c@x", "d@x"] {
            gate.like("a@x", other).await.unwrap();
            gate.like(other, "a@x").await.unwrap();
        }

        assert_eq!(gate.accept("a@x", "b@x").await.unwrap(), AcceptOutcome::Accepted);
        assert_eq!(gate.accept("a@x", "c@x").await.unwrap(), AcceptOutcome::Accepted);
        assert_eq!(
            gate.accept("a@x", "d@x").await.unwrap(),
            AcceptOutcome::PaymentRequired
        );

        // No mutation happened; after unlocking the specific match it goes through
        gate.unlock("a@x", "d@x").await.unwrap();
        assert_eq!(gate.accept("a@x", "d@x").await.unwrap(), AcceptOutcome::Accepted);
    }

    #[tokio::test]
    async fn test_accept_is_idempotent() {
        let (gate, _) = gate_with(2);
        gate.like("a@x", "b@x").await.unwrap();
        gate.like("b@x", "a@x").await.unwrap();

        assert_eq!(gate.accept("a@x", "b@x").await.unwrap(), AcceptOutcome::Accepted);
        assert_eq!(gate.accept("a@x", "b@x").await.unwrap(), AcceptOutcome::Accepted);
        assert_eq!(gate.accepted_count_for_tests("a@x").await, 1);
    }

    #[tokio::test]
    async fn test_history_round_trip() {
        let (gate, live) = gate_with(2);
        gate.like("a@x", "b@x").await.unwrap();
        gate.like("b@x", "a@x").await.unwrap();

        gate.check_and_relay("a@x", "b@x", "hello there").await.unwrap();
        gate.check_and_relay("b@x", "a@x", "well met").await.unwrap();

        let history = gate.history("a@x", "b@x").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].body, "hello there");

        let events = live.events().await;
        let relayed = events
            .iter()
            .filter(|(_, e)| matches!(e, LiveEvent::Message { .. }))
            .count();
        assert_eq!(relayed, 2);
    }

    impl MatchGate {
        async fn accepted_count_for_tests(&self, user: &str) -> u32 {
            self.store
                .accepted_count(&normalize_identity(user))
                .await
                .unwrap()
        }
    }
}
