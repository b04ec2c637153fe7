use crate::config::ServiceConfig;
use crate::errors::handle_rejection;
use crate::handlers::{self, RecentHandsQuery};
use crate::history::{HandRepository, HistoryError, HistoryStore};
use crate::middleware::with_request_logging;
use crate::service::HandService;
use showdown_engine::game::Hand;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use warp::filters::BoxedFilter;
use warp::http::HeaderValue;
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

/// Largest accepted hand submission body.
const MAX_BODY_BYTES: u64 = 64 * 1024;

#[derive(Clone)]
pub struct AppContext {
    config: ServiceConfig,
    repository: Arc<dyn HandRepository>,
    service: Arc<HandService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Builds the context, opening the hand journal when one is configured.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        check_origin(&config.cors_origin)?;
        let store = match &config.journal {
            Some(path) => HistoryStore::open_journal(path)?,
            None => HistoryStore::new(),
        };
        Ok(Self::new_with_repository(config, Arc::new(store)))
    }

    pub fn new_with_repository(config: ServiceConfig, repository: Arc<dyn HandRepository>) -> Self {
        let service = Arc::new(HandService::new(Arc::clone(&repository)));
        Self {
            config,
            repository,
            service,
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new_with_repository(ServiceConfig::for_tests(), Arc::new(HistoryStore::new()))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn repository(&self) -> Arc<dyn HandRepository> {
        Arc::clone(&self.repository)
    }

    pub fn service(&self) -> Arc<HandService> {
        Arc::clone(&self.service)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("History error: {0}")]
    History(#[from] HistoryError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        info!(%addr, cors_origin = %config.cors_origin, "hand service listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServiceConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host.as_str();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port));
        }

        let candidate = format!("{}:{}", host, config.port);
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    /// Every route with request logging, JSON rejections and CORS applied.
    pub fn routes(
        context: &AppContext,
    ) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        // rejections are rendered before logging so 4xx replies are logged too
        let api = Self::health_route()
            .or(Self::hand_routes(context))
            .unify()
            .recover(handle_rejection)
            .unify()
            .boxed();

        with_request_logging(api).with(Self::cors(&context.config().cors_origin))
    }

    fn cors(origin: &str) -> warp::filters::cors::Builder {
        let cors = warp::cors()
            .allow_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_headers(vec!["content-type", "accept"]);
        if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allow_origin(origin)
        }
    }

    fn health_route() -> BoxedFilter<(Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn hand_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
        let service = context.service();
        let default_limit = context.config().history_limit;

        let submit = warp::path!("api" / "v1" / "hands")
            .and(warp::post())
            .and(Self::with_service(service.clone()))
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::json())
            .and_then(|service: Arc<HandService>, hand: Hand| async move {
                Ok::<_, Infallible>(handlers::submit_hand(service, hand).await)
            });

        let recent = warp::path!("api" / "v1" / "hands")
            .and(warp::get())
            .and(Self::with_service(service.clone()))
            .and(warp::any().map(move || default_limit))
            .and(warp::query::<RecentHandsQuery>())
            .and_then(
                |service: Arc<HandService>, default_limit: usize, query: RecentHandsQuery| async move {
                    Ok::<_, Infallible>(handlers::recent_hands(service, default_limit, query).await)
                },
            );

        let by_id = warp::path!("api" / "v1" / "hands" / String)
            .and(warp::get())
            .and(Self::with_service(service))
            .and_then(|hand_id: String, service: Arc<HandService>| async move {
                Ok::<_, Infallible>(handlers::get_hand(service, hand_id).await)
            });

        submit.or(recent).unify().or(by_id).unify().boxed()
    }

    fn with_service(
        service: Arc<HandService>,
    ) -> impl Filter<Extract = (Arc<HandService>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&service))
    }
}

/// `*`, or a `scheme://host[:port]` origin that is a valid header value.
fn check_origin(origin: &str) -> Result<(), ServerError> {
    if origin == "*" {
        return Ok(());
    }
    let well_formed = match origin.split_once("://") {
        Some((scheme, host)) => {
            !scheme.is_empty() && !host.is_empty() && !host.contains('/')
        }
        None => false,
    };
    if !well_formed || HeaderValue::from_str(origin).is_err() {
        return Err(ServerError::ConfigError(format!(
            "invalid CORS origin `{origin}`"
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        info!(addr = %self.addr, "hand service stopped");
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_checks() {
        assert!(check_origin("http://localhost:3000").is_ok());
        assert!(check_origin("*").is_ok());
        assert!(check_origin("localhost:3000").is_err());
        assert!(check_origin("http://").is_err());
        assert!(check_origin("http://a.example/path").is_err());
    }

    #[test]
    fn bad_origin_fails_context() {
        let config = ServiceConfig {
            cors_origin: "nope".into(),
            ..ServiceConfig::for_tests()
        };
        assert!(matches!(
            AppContext::new(config),
            Err(ServerError::ConfigError(_))
        ));
    }

    #[test]
    fn bind_addr_uses_host_and_port() {
        let config = ServiceConfig {
            port: 8123,
            ..ServiceConfig::default()
        };
        assert_eq!(
            WebServer::bind_addr(&config).unwrap(),
            "127.0.0.1:8123".parse::<SocketAddr>().unwrap()
        );
    }
}
