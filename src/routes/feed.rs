use crate::core::{life_path_meaning, life_path_number, normalize_identity};
use crate::models::{
    DestinyCard, ErrorResponse, FeedResponse, ScoreFeedRequest, ScoredPair, UserAttributes,
};
use crate::routes::AppState;
use crate::services::CacheKey;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/feed/scores", web::post().to(score_feed));
}

/// Score the feed for a user
///
/// POST /api/v1/feed/scores
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20
/// }
/// ```
async fn score_feed(
    state: web::Data<AppState>,
    req: web::Json<ScoreFeedRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score_feed request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = normalize_identity(&req.user_id);
    // Cap limit to prevent excessive responses
    let limit = req.limit.min(100) as usize;

    tracing::info!("Scoring feed for user: {}, limit: {}", user_id, limit);

    let cache_key = CacheKey::feed(&user_id);
    if let Ok(cached) = state.cache.get::<FeedResponse>(&cache_key).await {
        tracing::debug!("Feed cache hit for {}", user_id);
        return HttpResponse::Ok().json(cached);
    }

    // Fetch requester attributes; structurally invalid profiles fail closed
    // to the fallback profile instead of crashing the feed render
    let me = match state.profiles.get(&user_id).await {
        Ok(Some(attrs)) => attrs,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message: format!("No profile for {}", user_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::warn!("Failed to load profile for {}, using fallback: {}", user_id, e);
            UserAttributes::fallback()
        }
    };

    let candidates = match state.profiles.list_candidates(&user_id).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to list candidates for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list candidates".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let total_candidates = candidates.len();

    let mut scored: Vec<ScoredPair> = candidates
        .into_iter()
        .map(|(candidate_id, attrs)| {
            let score = state.engine.score(&user_id, &me, &candidate_id, &attrs);
            ScoredPair {
                user_id: candidate_id,
                total: score.total,
                factors: score.factors,
                tier: score.tier,
            }
        })
        .collect();

    // Sort by score (descending), then identity for a stable order
    scored.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.user_id.cmp(&b.user_id)));
    scored.truncate(limit);

    let life_path = life_path_number(me.birth_date);
    let destiny = DestinyCard {
        user_id: user_id.clone(),
        score: state.engine.score(&user_id, &me, &user_id, &me).total,
        life_path,
        reading: life_path_meaning(life_path).to_string(),
    };

    let response = FeedResponse {
        destiny,
        matches: scored,
        total_candidates,
    };

    if let Err(e) = state.cache.set(&cache_key, &response).await {
        tracing::warn!("Failed to cache feed for {}: {}", user_id, e);
    }

    tracing::info!(
        "Returning {} scored matches for user {} (from {} candidates)",
        response.matches.len(),
        user_id,
        total_candidates
    );

    HttpResponse::Ok().json(response)
}
