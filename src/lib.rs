//! Fake CareCloud: a mock of the CareCloud practice-management API.
//!
//! Token issuance and the bearer gate live in [`auth`]; everything behind
//! the gate is thin persistence over [`store`].

pub mod api;
pub mod auth;
pub mod client;
pub mod clock;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod store;

use std::sync::Arc;

use auth::{MemoryTokenStore, SqlTokenStore, TokenStore};
use clock::{Clock, SystemClock};
use config::{Config, TokenBackend};
use store::Store;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub db: Store,
    pub tokens: Arc<dyn TokenStore>,
    pub config: Config,
    pub templates: tera::Tera,
}

impl AppState {
    pub fn new(db: Store, tokens: Arc<dyn TokenStore>, config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            tokens,
            config,
            templates: api::ui::templates()?,
        })
    }

    /// Open the configured database, apply migrations, load seed data and
    /// pick the token backend.
    pub async fn initialize(config: Config) -> anyhow::Result<Arc<Self>> {
        Self::initialize_with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn initialize_with_clock(
        config: Config,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Arc<Self>> {
        tracing::info!("Connecting to database...");
        let db = Store::connect(&config.database_url).await?;

        tracing::info!("Running migrations...");
        db.migrate().await?;

        store::seed::create_seed_data(&db).await?;

        let tokens: Arc<dyn TokenStore> = match config.token_backend {
            TokenBackend::Database => Arc::new(SqlTokenStore::new(db.pool().clone(), clock)),
            TokenBackend::Memory => Arc::new(MemoryTokenStore::new(clock)),
        };
        tracing::info!(backend = ?config.token_backend, "Token store ready");

        Ok(Arc::new(Self::new(db, tokens, config)?))
    }
}
