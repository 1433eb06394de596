use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::migrations::migrate;
use super::repositories::SlotCommand;

/// How long a statement waits on a lock held by another process sharing the
/// file before failing with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum WorkerMessage {
    Slot(SlotCommand),
    Shutdown,
}

struct WorkerHandle {
    sender: mpsc::Sender<WorkerMessage>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let mut guard = match self.thread.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let Some(thread) = guard.take() else {
            return;
        };
        if self.sender.send(WorkerMessage::Shutdown).is_err() {
            error!("slot worker already gone at shutdown");
        }
        if let Err(join_err) = thread.join() {
            error!("slot worker panicked: {join_err:?}");
        }
    }
}

/// SQLite-backed slot substrate. One worker thread owns the connection and
/// answers slot commands in arrival order, so each get/set/remove of a blob
/// is a single statement against a single connection.
#[derive(Clone)]
pub struct Database {
    worker: Arc<WorkerHandle>,
}

impl Database {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (sender, receiver) = mpsc::channel::<WorkerMessage>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let thread_path = db_path.clone();

        let thread = thread::Builder::new()
            .name("moodlens-slots".into())
            .spawn(move || {
                let conn = match open_connection(&thread_path) {
                    Ok(conn) => conn,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                if ready_tx.send(Ok(())).is_err() {
                    return;
                }

                while let Ok(message) = receiver.recv() {
                    match message {
                        WorkerMessage::Slot(command) => command.run(&conn),
                        WorkerMessage::Shutdown => break,
                    }
                }
                info!("slot worker stopped");
            })
            .context("failed to spawn slot worker thread")?;

        ready_rx
            .recv()
            .context("slot worker exited before signaling readiness")??;
        info!("slot database ready at {}", db_path.display());

        Ok(Self {
            worker: Arc::new(WorkerHandle {
                sender,
                thread: Mutex::new(Some(thread)),
            }),
        })
    }

    /// Send one slot command and wait for its reply.
    pub(super) async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> SlotCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.worker
            .sender
            .send(WorkerMessage::Slot(command(reply_tx)))
            .map_err(|_| anyhow!("slot worker is not running"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("slot worker dropped the request"))?
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    // Readers in other processes never block the whole-blob writer.
    let journal: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
        .context("failed to enable WAL journal")?;
    if !journal.eq_ignore_ascii_case("wal") {
        warn!("{} stays in {journal} journal mode", path.display());
    }
    conn.pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous mode")?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;

    migrate(&mut conn)?;
    Ok(conn)
}
