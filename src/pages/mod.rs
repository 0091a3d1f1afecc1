use axum::{Router, middleware, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::services::{CatalogService, SeaOrmCatalogService};

mod error;
pub mod flash;
pub mod form;
mod index;
mod observability;
mod system;
mod title;
mod types;
pub mod validation;

pub use error::PageError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub catalog: Arc<dyn CatalogService>,

    /// Backing store for readiness checks. `None` when the catalog is not
    /// database-backed.
    pub store: Option<Arc<Store>>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: Config,
        catalog: Arc<dyn CatalogService>,
        store: Option<Arc<Store>>,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            store,
            start_time: std::time::Instant::now(),
            prometheus_handle,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogService> {
        &self.catalog
    }
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Arc::new(
        Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?,
    );

    let catalog = Arc::new(SeaOrmCatalogService::new(
        store.clone(),
        config.listing.clone(),
    ));

    Ok(Arc::new(AppState::new(
        config,
        catalog,
        Some(store),
        prometheus_handle,
    )))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    Router::new()
        .route("/", get(index::index))
        .route("/title", get(title::show).post(title::submit))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}
