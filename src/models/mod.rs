// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ChatMessage, FactorScore, MatchRecord, Method, PairScore, ScoringBands, Tier, UserAttributes};
pub use requests::{AcceptChatRequest, HistoryQuery, LikeRequest, ScoreFeedRequest, SendMessageRequest, UnlockRequest};
pub use responses::{DestinyCard, ErrorResponse, FeedResponse, GateStatusResponse, HealthResponse, HistoryResponse, ScoredPair, SendMessageResponse};
