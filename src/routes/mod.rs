// Route exports
pub mod chat;
pub mod feed;
pub mod matches;

use crate::core::{MatchGate, PairScoreEngine};
use crate::services::{CacheManager, MatchStore, ProfileStore};
use actix_web::web;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileStore>,
    pub matches: Arc<dyn MatchStore>,
    pub cache: Arc<CacheManager>,
    pub engine: PairScoreEngine,
    pub gate: MatchGate,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(feed::configure)
            .configure(matches::configure)
            .configure(chat::configure),
    );
}
