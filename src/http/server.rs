//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the gateway or the resolver role
//! - Wire up middleware (tracing, request ID, inbound timeout)
//! - Bind server to listener
//! - Serve until shutdown, then flush spans

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{any, get},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::config::{PipelineConfig, Role};
use crate::http::gateway::{submit_postal_code, GatewayState};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::resolver::{missing_postal_code, resolve_temperature, ResolverState};
use crate::lifecycle::signals::wait_for_signal;
use crate::observability::Telemetry;
use crate::temperature::TemperatureResolver;

/// Errors raised while assembling or running a server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid url in {field}: {source}")]
    Url {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("base url in {field} cannot carry a path: {url}")]
    BaseUrl { field: &'static str, url: Url },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP server for one of the two pipeline roles.
pub struct HttpServer {
    router: Router,
    role: Role,
    telemetry: Arc<Telemetry>,
}

impl HttpServer {
    /// Front gateway: `ANY /cep`, forwarding to the configured resolver.
    pub fn gateway(config: &PipelineConfig, telemetry: Arc<Telemetry>) -> Result<Self, ServerError> {
        let resolver_url = Url::parse(&config.gateway.resolver_url).map_err(|source| ServerError::Url {
            field: "gateway.resolver_url",
            source,
        })?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = GatewayState {
            client,
            resolver_url,
            upstream_timeout: Duration::from_secs(config.timeouts.gateway_secs),
            max_body_bytes: config.gateway.max_body_bytes,
            telemetry: telemetry.clone(),
        };

        let routes = Router::new()
            .route("/cep", any(submit_postal_code))
            .route("/health", get(health))
            .with_state(state);

        Ok(Self {
            router: Self::apply_middleware(config, routes),
            role: Role::Gateway,
            telemetry,
        })
    }

    /// Back resolver: `GET /temperatura/{cep}`.
    pub fn resolver(
        config: &PipelineConfig,
        resolver: TemperatureResolver,
        telemetry: Arc<Telemetry>,
    ) -> Self {
        let state = ResolverState {
            resolver: Arc::new(resolver),
            telemetry: telemetry.clone(),
        };

        let routes = Router::new()
            .route("/temperatura/{cep}", get(resolve_temperature))
            .route("/temperatura/", get(missing_postal_code))
            .route("/health", get(health))
            .with_state(state);

        Self {
            router: Self::apply_middleware(config, routes),
            role: Role::Resolver,
            telemetry,
        }
    }

    /// Wrap routes with the middleware both roles share.
    ///
    /// Validation keeps `request_secs` above every outbound bound, so the
    /// inbound timeout is a backstop; if it fires the client sees a 500.
    fn apply_middleware(config: &PipelineConfig, routes: Router) -> Router {
        routes.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()),
                    )
                }))
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Duration::from_secs(config.timeouts.request_secs),
                )),
        )
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Serve on `listener` until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(role = %self.role, address = %addr, "HTTP server starting");

        let stop = async move {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested");
                }
                _ = wait_for_signal() => {}
            }
        };

        axum::serve(listener, self.router)
            .with_graceful_shutdown(stop)
            .await?;

        self.telemetry.shutdown();
        tracing::info!(role = %self.role, "HTTP server stopped");
        Ok(())
    }
}

async fn health() -> &'static str {
    "ok"
}
