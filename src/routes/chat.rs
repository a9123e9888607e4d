use crate::core::{GateError, RelayOutcome};
use crate::models::{
    ErrorResponse, HistoryQuery, HistoryResponse, SendMessageRequest, SendMessageResponse,
};
use crate::routes::AppState;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat/send", web::post().to(send_message))
        .route("/chat/history", web::get().to(history));
}

fn gate_error_response(context: &str, e: GateError) -> HttpResponse {
    match e {
        GateError::NotMutual => HttpResponse::Forbidden().json(ErrorResponse {
            error: "not_mutual".to_string(),
            message: "No mutual match between these users".to_string(),
            status_code: 403,
        }),
        GateError::Classifier(e) => {
            // Fail closed: the message is not relayed when the classifier
            // cannot be reached
            tracing::error!("Leak classifier unavailable: {}", e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "classifier_unavailable".to_string(),
                message: "Message could not be scanned; try again shortly".to_string(),
                status_code: 503,
            })
        }
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

/// Send a chat message
///
/// POST /api/v1/chat/send
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "targetUserId": "string",
///   "content": "string"
/// }
/// ```
///
/// A flagged message dissolves the match and returns
/// `{"status": "rejected", "reason": "contact_info_detected"}`.
async fn send_message(
    state: web::Data<AppState>,
    req: web::Json<SendMessageRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .gate
        .check_and_relay(&req.user_id, &req.target_user_id, &req.content)
        .await
    {
        Ok(RelayOutcome::Sent(message)) => {
            tracing::debug!(
                "Message {} relayed: {} -> {}",
                message.id,
                req.user_id,
                req.target_user_id
            );
            HttpResponse::Ok().json(SendMessageResponse {
                status: "sent".to_string(),
                message_id: Some(message.id),
                reason: None,
            })
        }
        Ok(RelayOutcome::Rejected { reason }) => {
            tracing::info!(
                "Message rejected and match dissolved: {} -> {}",
                req.user_id,
                req.target_user_id
            );
            HttpResponse::Ok().json(SendMessageResponse {
                status: "rejected".to_string(),
                message_id: None,
                reason: Some(reason.to_string()),
            })
        }
        Err(e) => gate_error_response("send", e),
    }
}

/// Fetch persisted chat history
///
/// GET /api/v1/chat/history?userId={userId}&targetUserId={targetUserId}
async fn history(state: web::Data<AppState>, query: web::Query<HistoryQuery>) -> impl Responder {
    match state.gate.history(&query.user_id, &query.target_user_id).await {
        Ok(messages) => {
            let count = messages.len();
            HttpResponse::Ok().json(HistoryResponse { messages, count })
        }
        Err(e) => gate_error_response("history", e),
    }
}
