use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{any, get},
};
use patientql_graphql::{GraphQLState, PatientSchemaBuilder, graphql_handler};
use patientql_storage::DynStorage;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, StorageBackend},
    handlers, middleware as app_middleware,
};

/// State for the operational routes.
#[derive(Clone)]
pub struct AppState {
    pub storage: DynStorage,
}

pub struct PatientqlServer {
    addr: SocketAddr,
    app: Router,
}

/// Builds the router: the GraphQL endpoint on `graphql.path` (any method)
/// plus `/healthz` and `/readyz`.
pub fn build_app(cfg: &AppConfig, storage: DynStorage) -> anyhow::Result<Router> {
    let schema = PatientSchemaBuilder::new(cfg.graphql.to_schema_builder_config()).build()?;
    let graphql_state = GraphQLState::new(schema, storage.clone());

    let graphql_routes = Router::new()
        .route(&cfg.graphql.path, any(graphql_handler))
        .with_state(graphql_state);

    let app = Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .with_state(AppState { storage })
        .merge(graphql_routes)
        // Outermost first: request id -> trace -> cors -> compression
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(app_middleware::request_id))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &axum::http::Request<_>| {
                            use tracing::field::Empty;
                            let req_id = req
                                .extensions()
                                .get::<axum::http::HeaderValue>()
                                .and_then(|v| v.to_str().ok())
                                .unwrap_or("")
                                .to_string();
                            tracing::info_span!(
                                "http.request",
                                http.method = %req.method(),
                                http.target = %req.uri(),
                                http.status_code = Empty,
                                request_id = %req_id
                            )
                        })
                        .on_response(
                            |res: &axum::http::Response<_>,
                             latency: std::time::Duration,
                             span: &tracing::Span| {
                                span.record(
                                    "http.status_code",
                                    tracing::field::display(res.status().as_u16()),
                                );
                                tracing::info!(
                                    http.status = %res.status().as_u16(),
                                    elapsed_ms = %latency.as_millis(),
                                    "request handled"
                                );
                            },
                        ),
                )
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        );

    Ok(app)
}

/// Opens the storage backend selected by configuration.
///
/// For PostgreSQL this connects, checks the connection and applies
/// migrations when `run_migrations` is set.
pub async fn create_storage(cfg: &AppConfig) -> anyhow::Result<DynStorage> {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Ok(patientql_db_memory::create_storage())
        }
        StorageBackend::Postgres => {
            let storage: DynStorage =
                patientql_db_postgres::create_storage(cfg.storage.postgres.clone()).await?;
            Ok(storage)
        }
    }
}

#[derive(Default)]
pub struct ServerBuilder {
    addr: Option<SocketAddr>,
    config: AppConfig,
    storage: Option<DynStorage>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    /// Uses an already opened storage instead of the configured backend.
    pub fn with_storage(mut self, storage: DynStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    pub async fn build(self) -> anyhow::Result<PatientqlServer> {
        let storage = match self.storage {
            Some(storage) => storage,
            None => create_storage(&self.config).await?,
        };
        tracing::info!(backend = storage.backend_name(), "Storage ready");

        let app = build_app(&self.config, storage)?;

        let addr = match self.addr {
            Some(addr) => addr,
            None => self.config.addr().map_err(anyhow::Error::msg)?,
        };

        Ok(PatientqlServer { addr, app })
    }
}

impl PatientqlServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn memory_app(cfg: &AppConfig) -> Router {
        build_app(cfg, patientql_db_memory::create_storage()).unwrap()
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn healthz_ok_and_request_id_generated() {
        let res = memory_app(&AppConfig::default())
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(body_json(res).await["status"], "ok");
    }

    #[tokio::test]
    async fn incoming_request_id_is_echoed() {
        let res = memory_app(&AppConfig::default())
            .oneshot(
                Request::get("/healthz")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn graphql_path_is_configurable() {
        let mut cfg = AppConfig::default();
        cfg.graphql.path = "/graphql".into();
        let app = memory_app(&cfg);

        let res = app
            .clone()
            .oneshot(
                Request::get("/graphql?query=%7BgetPatients%7Bid%7D%7D")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"data": {"getPatients": []}})
        );

        let res = app
            .oneshot(Request::get("/patient").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn builder_uses_injected_storage() {
        let server = ServerBuilder::new()
            .with_config(AppConfig::default())
            .with_addr(SocketAddr::from(([127, 0, 0, 1], 0)))
            .with_storage(Arc::new(patientql_db_memory::InMemoryStorage::new()))
            .build()
            .await
            .unwrap();

        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }
}
