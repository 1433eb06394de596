use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::oneshot;

use crate::{db::connection::Database, storage::SlotStore};

/// One unit of work for the slot worker thread, carrying its reply channel.
pub(crate) enum SlotCommand {
    Get {
        key: String,
        reply: oneshot::Sender<Result<Option<String>>>,
    },
    Put {
        key: String,
        value: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Remove {
        key: String,
        reply: oneshot::Sender<Result<()>>,
    },
}

impl SlotCommand {
    /// Runs on the worker thread. A dropped reply means the caller gave up,
    /// which is not an error for the worker.
    pub(crate) fn run(self, conn: &Connection) {
        match self {
            SlotCommand::Get { key, reply } => {
                let _ = reply.send(read_slot(conn, &key));
            }
            SlotCommand::Put { key, value, reply } => {
                let _ = reply.send(write_slot(conn, &key, &value));
            }
            SlotCommand::Remove { key, reply } => {
                let _ = reply.send(delete_slot(conn, &key));
            }
        }
    }
}

fn read_slot(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.prepare_cached("SELECT value FROM kv_slots WHERE key = ?1")?
        .query_row(params![key], |row| row.get::<_, String>(0))
        .optional()
        .with_context(|| format!("failed to read slot {key}"))
}

fn write_slot(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.prepare_cached(
        "INSERT INTO kv_slots (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at",
    )?
    .execute(params![key, value, Utc::now().to_rfc3339()])
    .with_context(|| format!("failed to write slot {key}"))?;
    debug!("slot {key} written ({} bytes)", value.len());
    Ok(())
}

fn delete_slot(conn: &Connection, key: &str) -> Result<()> {
    conn.prepare_cached("DELETE FROM kv_slots WHERE key = ?1")?
        .execute(params![key])
        .with_context(|| format!("failed to remove slot {key}"))?;
    Ok(())
}

#[async_trait]
impl SlotStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.request(|reply| SlotCommand::Get { key, reply }).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let key = key.to_string();
        self.request(|reply| SlotCommand::Put { key, value, reply })
            .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.request(|reply| SlotCommand::Remove { key, reply })
            .await
    }
}
