use crate::models::{ProgressStore, PROGRESS_VERSION};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous},
    ConnectOptions, Pool, Sqlite,
};
use std::str::FromStr;
use tokio::sync::mpsc;

/// Key the progress blob is stored under. Bump the suffix when the format
/// changes incompatibly.
pub const STORAGE_KEY: &str = "fr_conj_er_app_v1";

/// Receives the whole progress store after every mutation. Implementations
/// must not block and must swallow their own failures.
pub trait ProgressSink: Send + Sync {
    fn save(&self, store: &ProgressStore);
}

#[derive(Clone)]
pub struct Db {
    pool: Pool<Sqlite>,
    key: String,
}

impl Db {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .log_statements(log::LevelFilter::Trace);

        let pool = SqlitePool::connect_with(options).await?;
        Self::from_pool(pool, STORAGE_KEY).await
    }

    pub async fn from_pool(pool: Pool<Sqlite>, key: &str) -> anyhow::Result<Self> {
        let db = Db {
            pool,
            key: key.to_string(),
        };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                saved_at DATETIME
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Stored progress, or `None` if nothing usable is stored.
    pub async fn load_progress(&self) -> Option<ProgressStore> {
        let raw = match sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("could not read stored progress: {}", e);
                return None;
            }
        };

        parse_progress(&raw?)
    }

    pub async fn write_raw(&self, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, saved_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, saved_at = excluded.saved_at
            "#,
        )
        .bind(&self.key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Starts the background task that performs saves in submission order.
    pub fn spawn_writer(&self) -> ProgressWriter {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let db = self.clone();
        tokio::spawn(async move {
            while let Some(value) = rx.recv().await {
                if let Err(e) = db.write_raw(&value).await {
                    log::warn!("failed to save progress: {}", e);
                }
            }
        });
        ProgressWriter { tx }
    }
}

fn parse_progress(raw: &str) -> Option<ProgressStore> {
    let store: ProgressStore = match serde_json::from_str(raw) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("ignoring malformed stored progress: {}", e);
            return None;
        }
    };
    if store.version != PROGRESS_VERSION {
        log::warn!("ignoring stored progress with version {}", store.version);
        return None;
    }
    let store = store.sanitized();
    if store.is_none() {
        log::warn!("ignoring stored progress with out-of-range counts");
    }
    store
}

pub struct ProgressWriter {
    tx: mpsc::UnboundedSender<String>,
}

impl ProgressSink for ProgressWriter {
    fn save(&self, store: &ProgressStore) {
        match serde_json::to_string(store) {
            Ok(value) => {
                if self.tx.send(value).is_err() {
                    log::warn!("progress writer has stopped; save dropped");
                }
            }
            Err(e) => log::warn!("failed to serialise progress: {}", e),
        }
    }
}
