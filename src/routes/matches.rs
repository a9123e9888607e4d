use crate::core::{normalize_identity, AcceptOutcome, GateError, LikeOutcome};
use crate::models::{
    AcceptChatRequest, ErrorResponse, GateStatusResponse, HealthResponse, LikeRequest,
    UnlockRequest,
};
use crate::routes::AppState;
use crate::services::CacheKey;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/like", web::post().to(like))
        .route("/matches/accept", web::post().to(accept))
        .route("/matches/unlock", web::post().to(unlock));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.matches.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn gate_error_response(context: &str, e: GateError) -> HttpResponse {
    match e {
        GateError::NotMutual => HttpResponse::Forbidden().json(ErrorResponse {
            error: "not_mutual".to_string(),
            message: "No mutual match between these users".to_string(),
            status_code: 403,
        }),
        other => {
            tracing::error!("{} failed: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("{}_failed", context),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Like endpoint
///
/// POST /api/v1/matches/like
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string"
/// }
/// ```
///
/// Returns `{"status": "liked"}` or `{"status": "match"}` once the reverse
/// like exists. Duplicate likes are a no-op, not an error.
async fn like(state: web::Data<AppState>, req: web::Json<LikeRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.gate.like(&req.user_id, &req.target_user_id).await {
        Ok(outcome) => {
            // A new like can change what either side's feed should show
            for id in [&req.user_id, &req.target_user_id] {
                let key = CacheKey::feed(&normalize_identity(id));
                if let Err(e) = state.cache.delete(&key).await {
                    tracing::warn!("Failed to invalidate feed cache {}: {}", key, e);
                }
            }

            let status = match outcome {
                LikeOutcome::Liked => "liked",
                LikeOutcome::MutualMatch => "match",
            };

            tracing::info!(
                "Like recorded: {} -> {} ({})",
                req.user_id,
                req.target_user_id,
                status
            );

            HttpResponse::Ok().json(GateStatusResponse {
                status: status.to_string(),
            })
        }
        Err(e) => gate_error_response("like", e),
    }
}

/// Accept a pending chat
///
/// POST /api/v1/matches/accept
///
/// Each user gets a fixed number of free accepted chats; beyond that the
/// specific match must carry a paid unlock, otherwise the response is
/// 402 `{"status": "payment_required"}` and nothing changes.
async fn accept(state: web::Data<AppState>, req: web::Json<AcceptChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.gate.accept(&req.user_id, &req.target_user_id).await {
        Ok(AcceptOutcome::Accepted) => HttpResponse::Ok().json(GateStatusResponse {
            status: "accepted".to_string(),
        }),
        Ok(AcceptOutcome::PaymentRequired) => {
            HttpResponse::PaymentRequired().json(GateStatusResponse {
                status: "payment_required".to_string(),
            })
        }
        Err(e) => gate_error_response("accept", e),
    }
}

/// Apply a paid unlock to a mutual match
///
/// POST /api/v1/matches/unlock
async fn unlock(state: web::Data<AppState>, req: web::Json<UnlockRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.gate.unlock(&req.user_id, &req.target_user_id).await {
        Ok(()) => {
            tracing::info!("Unlocked match: {} <-> {}", req.user_id, req.target_user_id);
            HttpResponse::Ok().json(GateStatusResponse {
                status: "unlocked".to_string(),
            })
        }
        Err(e) => gate_error_response("unlock", e),
    }
}
