//! Cosmic Match - compatibility scoring and match gating for the Cosmic Match dating app
//!
//! This library provides the two core components behind the app:
//! deterministic symmetric pair scoring (astrology, numerology, palmistry)
//! and the like/mutual-match/chat-gating state machine.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchGate, PairScoreEngine, PairKey, normalize_identity};
pub use models::{MatchRecord, PairScore, ScoringBands, Tier, UserAttributes};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let key = PairKey::new("B@x.com", "a@x.com");
        assert_eq!(key.lo, "a@x.com");
    }
}
