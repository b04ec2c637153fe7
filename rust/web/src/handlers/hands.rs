use std::sync::Arc;

use serde::Deserialize;
use showdown_engine::game::Hand;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

use crate::errors::{ErrorResponse, IntoErrorResponse};
use crate::history::HistoryListResponse;
use crate::service::HandService;

#[derive(Debug, Default, Deserialize)]
pub struct RecentHandsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// POST /api/v1/hands
///
/// Submission may append to the hand journal, so it runs on the blocking pool.
pub async fn submit_hand(service: Arc<HandService>, hand: Hand) -> Response {
    match tokio::task::spawn_blocking(move || service.submit(hand)).await {
        Ok(Ok(result)) => {
            reply::with_status(reply::json(&result), StatusCode::CREATED).into_response()
        }
        Ok(Err(err)) => err.into_http_response(),
        Err(err) => {
            tracing::error!(error = %err, "hand submission task failed");
            ErrorResponse::new("internal_error", "Hand submission failed")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/v1/hands?limit=N
pub async fn recent_hands(
    service: Arc<HandService>,
    default_limit: usize,
    query: RecentHandsQuery,
) -> Response {
    let limit = query.limit.unwrap_or(default_limit);
    match service.recent(limit) {
        Ok(hands) => reply::json(&HistoryListResponse { hands }).into_response(),
        Err(err) => err.into_http_response(),
    }
}

/// GET /api/v1/hands/{hand_id}
pub async fn get_hand(service: Arc<HandService>, hand_id: String) -> Response {
    match service.find(&hand_id) {
        Ok(entry) => reply::json(&entry).into_response(),
        Err(err) => err.into_http_response(),
    }
}
