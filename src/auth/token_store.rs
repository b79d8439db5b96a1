use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::models::token::AccessToken;

/// Single-slot storage for the one live access token.
///
/// `issue` is the only writer: it replaces whatever is stored with a freshly
/// minted token, so any earlier value stops validating immediately.
/// `validate` never mutates; expired rows linger until the next `issue`.
/// Both backends load the stored token and compare it with
/// [`AccessToken::matches`], so the check runs in constant time either way.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn issue(&self) -> anyhow::Result<AccessToken>;

    async fn validate(&self, candidate: &str) -> anyhow::Result<bool>;
}

/// Token slot backed by the `auth_tokens` table.
pub struct SqlTokenStore {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqlTokenStore {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl TokenStore for SqlTokenStore {
    async fn issue(&self) -> anyhow::Result<AccessToken> {
        let token = AccessToken::mint(self.clock.now());

        // Delete + insert commit together; no reader sees zero or two rows.
        let mut tx = self.pool.begin().await?;
        let superseded = sqlx::query("DELETE FROM auth_tokens")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query(
            r#"INSERT INTO auth_tokens (access_token, token_type, expires_at, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&token.access_token)
        .bind(&token.token_type)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(
            superseded,
            expires_at = %token.expires_at,
            "issued access token"
        );
        Ok(token)
    }

    async fn validate(&self, candidate: &str) -> anyhow::Result<bool> {
        // `issue` keeps at most one row, so the slot is read whole and the
        // value comparison happens here rather than in SQL.
        let row = sqlx::query_as::<_, AccessToken>(
            "SELECT access_token, token_type, expires_at, created_at FROM auth_tokens LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some_and(|token| token.matches(candidate) && token.is_live_at(self.clock.now())))
    }
}

/// Token slot held in process memory. Lost on restart.
pub struct MemoryTokenStore {
    slot: RwLock<Option<AccessToken>>,
    clock: Arc<dyn Clock>,
}

impl MemoryTokenStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            clock,
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn issue(&self) -> anyhow::Result<AccessToken> {
        let mut slot = self.slot.write().await;
        let token = AccessToken::mint(self.clock.now());
        let superseded = slot.replace(token.clone()).is_some();
        drop(slot);

        tracing::info!(
            superseded,
            expires_at = %token.expires_at,
            "issued access token"
        );
        Ok(token)
    }

    async fn validate(&self, candidate: &str) -> anyhow::Result<bool> {
        let slot = self.slot.read().await;
        let Some(token) = slot.as_ref() else {
            return Ok(false);
        };
        Ok(token.matches(candidate) && token.is_live_at(self.clock.now()))
    }
}
