use std::time::Instant;
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::reject::Rejection;
use warp::reply::{Reply, Response};
use warp::Filter;

struct RequestStart {
    path: String,
    method: String,
    at: Instant,
}

/// Wraps `filter` so every matched request is logged on entry and its
/// response logged with status and duration.
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .map(|path: FullPath, method: Method| {
            tracing::info!(
                path = %path.as_str(),
                method = %method,
                "incoming request"
            );
            RequestStart {
                path: path.as_str().to_string(),
                method: method.to_string(),
                at: Instant::now(),
            }
        })
        .and(filter)
        .map(|start: RequestStart, reply: T| {
            let response = reply.into_response();
            log_response(
                response.status(),
                &start.path,
                &start.method,
                start.at.elapsed().as_millis(),
            );
            response
        })
}

/// Log response with status code
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    if status.is_client_error() {
        tracing::warn!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "client error"
        );
    } else if status.is_server_error() {
        tracing::error!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "server error"
        );
    } else {
        tracing::info!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::TestLogSubscriber;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    #[tokio::test]
    async fn test_request_logging_middleware() {
        let subscriber = TestLogSubscriber::new();
        let layer = subscriber.clone().into_layer::<Registry>();
        let registry = Registry::default().with(layer);

        let _guard = tracing::subscriber::set_default(registry);

        let route = warp::path!("test")
            .and(warp::get())
            .map(|| warp::reply::json(&"success"));

        let logged_route = with_request_logging(route);

        let response = warp::test::request()
            .method("GET")
            .path("/test")
            .reply(&logged_route)
            .await;

        assert_eq!(response.status(), StatusCode::OK);

        let entries = subscriber.entries();
        assert!(entries
            .iter()
            .any(|e| e.level == Level::INFO && e.message.contains("incoming request")));
        assert!(entries
            .iter()
            .any(|e| e.level == Level::INFO && e.message.contains("request completed")));
        assert_eq!(subscriber.with_field("status", "200").len(), 1);
    }

    #[tokio::test]
    async fn error_statuses_are_logged_as_warnings() {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());
        let _guard = tracing::subscriber::set_default(registry);

        let route = warp::path!("missing").map(|| {
            warp::reply::with_status(warp::reply::json(&"gone"), StatusCode::NOT_FOUND)
        });
        let response = warp::test::request()
            .path("/missing")
            .reply(&with_request_logging(route))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let warned = subscriber.with_field("status", "404");
        assert_eq!(warned.len(), 1);
        assert_eq!(warned[0].level, Level::WARN);
    }

    #[test]
    fn test_log_response_server_error() {
        let subscriber = TestLogSubscriber::new();
        let layer = subscriber.clone().into_layer::<Registry>();
        let registry = Registry::default().with(layer);

        tracing::subscriber::with_default(registry, || {
            log_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "/api/v1/hands",
                "POST",
                200,
            );
        });

        let entries = subscriber.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, Level::ERROR);
        assert!(entries[0].message.contains("server error"));
        assert!(entries[0]
            .fields
            .iter()
            .any(|(k, v)| k == "path" && v.contains("/api/v1/hands")));
    }
}
