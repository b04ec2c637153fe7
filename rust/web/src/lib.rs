//! # showdown_web: HTTP service around the poker hand engine
//!
//! Accepts recorded hands over JSON, validates and settles them with
//! [`showdown_engine`], keeps a recent-hands history and serves lookups.
//!
//! - `POST /api/v1/hands` settles a hand (`201`, `422` on invalid input)
//! - `GET /api/v1/hands?limit=N` lists the most recent hands
//! - `GET /api/v1/hands/{hand_id}` fetches one stored hand
//! - `GET /health` liveness probe

pub mod config;
pub mod errors;
pub mod handlers;
pub mod history;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod service;

pub use config::{ConfigError, ConfigResolved, ServerArgs, ServiceConfig};
pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use history::{
    HandHistoryEntry, HandRepository, HandSummary, HistoryError, HistoryListResponse, HistoryStore,
};
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use middleware::{log_response, with_request_logging};
pub use server::{AppContext, ServerError, ServerHandle, WebServer};
pub use service::{HandService, ServiceError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_provides_shared_components() {
        let ctx = AppContext::new_for_tests();

        assert_eq!(ctx.config().history_limit, 5);
        assert!(ctx.repository().recent(5).unwrap().is_empty());
        assert!(ctx.service().recent(5).unwrap().is_empty());
    }
}
