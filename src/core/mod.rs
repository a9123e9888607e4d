// Core algorithm exports
pub mod gate;
pub mod numerology;
pub mod scoring;
pub mod seed;
pub mod zodiac;

pub use gate::{AcceptOutcome, GateError, LikeOutcome, MatchGate, RelayOutcome};
pub use numerology::{life_path_meaning, life_path_number};
pub use scoring::{PairScoreEngine, FACTORS, SELF_SCORE};
pub use seed::{normalize_identity, pair_seed_string, PairKey};
pub use zodiac::{element_of, sun_sign, Element};
