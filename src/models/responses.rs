use crate::models::domain::{ChatMessage, FactorScore, Tier};
use serde::{Deserialize, Serialize};

/// One scored candidate in the feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPair {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub total: u8,
    pub factors: Vec<FactorScore>,
    pub tier: Tier,
}

/// The requesting user's own "destiny" card, always a perfect score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinyCard {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub score: u8,
    #[serde(rename = "lifePath")]
    pub life_path: u8,
    pub reading: String,
}

/// Response for the feed scoring endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub destiny: DestinyCard,
    pub matches: Vec<ScoredPair>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for like/accept/unlock gate actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateStatusResponse {
    pub status: String,
}

/// Response for the chat send endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub status: String,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<uuid::Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response for the chat history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessage>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
