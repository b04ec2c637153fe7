use std::sync::Arc;

use serde_json::json;
use showdown_engine::errors::{ProcessingError, ValidationError};
use showdown_engine::game::{Hand, HandResult};
use showdown_engine::logger::HandRecord;
use thiserror::Error;
use tracing::{info, warn};
use warp::http::StatusCode;

use crate::errors::{ErrorSeverity, IntoErrorResponse};
use crate::history::{HandHistoryEntry, HandRepository, HandSummary, HistoryError};

/// Validates, settles and records submitted hands.
#[derive(Clone)]
pub struct HandService {
    repository: Arc<dyn HandRepository>,
}

impl HandService {
    pub fn new(repository: Arc<dyn HandRepository>) -> Self {
        Self { repository }
    }

    /// Runs a hand through validation and evaluation, then stores it.
    ///
    /// Storage failures are logged and do not fail the submission.
    pub fn submit(&self, hand: Hand) -> Result<HandResult, ServiceError> {
        showdown_engine::validate(&hand)?;
        let result = showdown_engine::evaluate(&hand)?;

        match self.repository.save(HandRecord::from_result(&result)) {
            Ok(_) => info!(hand_id = %result.hand_id, "hand stored"),
            Err(err) => warn!(hand_id = %result.hand_id, error = %err, "failed to store hand"),
        }
        Ok(result)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<HandSummary>, ServiceError> {
        info!(limit, "fetching recent hands");
        let hands = self.repository.recent(limit)?;
        info!(count = hands.len(), "retrieved hands");
        Ok(hands.iter().map(HandSummary::from).collect())
    }

    pub fn find(&self, hand_id: &str) -> Result<HandHistoryEntry, ServiceError> {
        match self.repository.find_by_id(hand_id)? {
            Some(record) => Ok(HandHistoryEntry::from(&record)),
            None => Err(HistoryError::NotFound(hand_id.to_string()).into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Error processing hand: {0}")]
    Processing(#[from] ProcessingError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

impl IntoErrorResponse for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::History(err) => err.status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::Processing(_) => "processing_error",
            ServiceError::History(err) => err.error_code(),
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::Validation(err) => Some(json!({
                "field": err.field(),
                "player_id": err.player_id(),
            })),
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            ServiceError::History(err) => err.severity(),
            _ if self.status_code().is_server_error() => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }
}
