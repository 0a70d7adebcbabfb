use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::migrations::run_migrations;

type Job = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum Message {
    Run(Job),
    Stop,
}

struct Worker {
    jobs: mpsc::Sender<Message>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Worker {
    fn drop(&mut self) {
        let handle = match self.handle.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let Some(handle) = handle else {
            return;
        };
        if self.jobs.send(Message::Stop).is_err() {
            error!("Store worker already gone at shutdown");
        }
        if let Err(panic) = handle.join() {
            error!("Store worker panicked: {panic:?}");
        }
    }
}

fn open_store(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("cannot open log store at {}", path.display()))?;
    if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
        error!("Log store stays in rollback-journal mode: {err}");
    }
    run_migrations(&mut conn).context("log store migration failed")?;
    Ok(conn)
}

/// Handle to the day-log store. One connection is owned by a worker thread;
/// every query runs there as a closure and the result comes back on a
/// oneshot channel. Clones share the same worker.
#[derive(Clone)]
pub struct Database {
    worker: Arc<Worker>,
}

impl Database {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create data directory {}", dir.display()))?;
        }

        let (jobs, inbox) = mpsc::channel::<Message>();
        let (opened_tx, opened_rx) = mpsc::channel::<Result<()>>();
        let store_path = path.clone();

        let handle = thread::Builder::new()
            .name("lifeline-db".into())
            .spawn(move || {
                let mut conn = match open_store(&store_path) {
                    Ok(conn) => {
                        let _ = opened_tx.send(Ok(()));
                        conn
                    }
                    Err(err) => {
                        let _ = opened_tx.send(Err(err));
                        return;
                    }
                };

                while let Ok(Message::Run(job)) = inbox.recv() {
                    job(&mut conn);
                }
                info!("Log store closed");
            })
            .context("cannot start the store worker thread")?;

        opened_rx
            .recv()
            .context("store worker exited while opening the database")??;
        info!("Log store ready at {}", path.display());

        Ok(Self {
            worker: Arc::new(Worker {
                jobs,
                handle: Mutex::new(Some(handle)),
            }),
        })
    }

    /// Runs `task` on the store thread and waits for its result.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply, answer) = oneshot::channel();
        let job: Job = Box::new(move |conn| {
            // The caller may have stopped waiting; the result is dropped then.
            let _ = reply.send(task(conn));
        });

        self.worker
            .jobs
            .send(Message::Run(job))
            .map_err(|_| anyhow!("log store is shut down"))?;
        answer
            .await
            .map_err(|_| anyhow!("log store worker stopped before replying"))?
    }
}
