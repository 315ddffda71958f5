//! PostgreSQL store of record.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;
use tracing::{debug, info, warn};

use super::KvStore;
use crate::config::DatabaseConfig;
use crate::error::{KvError, Result};

const APPLICATION_NAME: &str = "kv_cache_server";

/// sqlx-backed store over the `kvstore` table.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Bootstraps the database and table if missing, then opens a pool.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Self::ensure_database(config).await?;

        info!("Connecting to PostgreSQL database '{}'...", config.name);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_open_conns)
            .min_connections(config.max_idle_conns.min(config.max_open_conns))
            .max_lifetime(Some(config.conn_max_lifetime()))
            .connect_with(connect_options(config).database(&config.name))
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                KvError::Store(format!("Failed to connect: {}", e))
            })?;
        info!("Connected to '{}'", config.name);

        let store = Self { pool };
        store.ensure_table().await?;
        Ok(store)
    }

    /// Creates the application database through the maintenance database.
    ///
    /// The maintenance database is the one named after the login user.
    async fn ensure_database(config: &DatabaseConfig) -> Result<()> {
        let mut conn = PgConnection::connect_with(&connect_options(config).database(&config.user))
            .await
            .map_err(|e| KvError::Store(format!("PostgreSQL server not reachable: {}", e)))?;

        let exists = sqlx::query("SELECT 1 FROM pg_database WHERE datname = $1")
            .bind(&config.name)
            .fetch_optional(&mut conn)
            .await?
            .is_some();

        if exists {
            info!("Database '{}' already exists", config.name);
        } else {
            // Identifiers cannot be bound as parameters.
            let ddl = format!("CREATE DATABASE {}", quote_ident(&config.name));
            sqlx::query(&ddl).execute(&mut conn).await?;
            info!("Database '{}' created", config.name);
        }

        conn.close().await?;
        Ok(())
    }

    async fn ensure_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kvstore (
                key BIGINT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        info!("Table 'kvstore' ready");
        Ok(())
    }
}

#[async_trait]
impl KvStore for PgStore {
    async fn insert(&self, key: i64, value: &str) -> Result<()> {
        debug!("INSERT key {}", key);
        sqlx::query("INSERT INTO kvstore (key, value) VALUES ($1, $2)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if KvError::is_unique_violation(&e) {
                    KvError::Conflict(key)
                } else {
                    KvError::from(e)
                }
            })?;
        Ok(())
    }

    async fn update(&self, key: i64, value: &str) -> Result<()> {
        debug!("UPDATE key {}", key);
        let result = sqlx::query("UPDATE kvstore SET value = $1 WHERE key = $2")
            .bind(value)
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KvError::NotFound(key));
        }
        Ok(())
    }

    async fn delete(&self, key: i64) -> Result<()> {
        debug!("DELETE key {}", key);
        let result = sqlx::query("DELETE FROM kvstore WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(KvError::NotFound(key));
        }
        Ok(())
    }

    async fn lookup(&self, key: i64) -> Result<Option<String>> {
        debug!("SELECT key {}", key);
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kvstore WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| KvError::Store(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Closes the pool, waiting for checked-out connections.
    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .application_name(APPLICATION_NAME)
}

/// Double-quotes a PostgreSQL identifier.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
