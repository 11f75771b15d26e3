use super::{Report, E};

use log::{debug, error};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

enum Task {
    /// Process one file; carries the file's index in the input list.
    Hash(usize, PathBuf),
    Shutdown,
}

/// `Worker` owns one thread and processes one file at a time. The result is reported back to the
/// pool together with the worker's id and the file's index, so the pool can hand out the next
/// file to the same worker and store the result in the right slot.
pub struct Worker {
    pub id: usize,
    tx_task: Sender<Task>,
    available: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn run<T, F>(id: usize, tx_queue: Sender<Report<T>>, job: Arc<F>) -> Self
    where
        T: Send + 'static,
        F: Fn(&Path) -> Result<T, E> + Send + Sync + 'static,
    {
        let (tx_task, rx_task): (Sender<Task>, Receiver<Task>) = channel();
        let available: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
        let available_inner = available.clone();
        let handle = thread::spawn(move || {
            while let Ok(task) = rx_task.recv() {
                let (idx, path) = match task {
                    Task::Hash(idx, path) => (idx, path),
                    Task::Shutdown => break,
                };
                let result = catch_unwind(AssertUnwindSafe(|| (*job)(&path)))
                    .unwrap_or_else(|_| Err(E::Panicked(path.clone())));
                if tx_queue.send((id, idx, result)).is_err() {
                    error!("Worker cannot communicate with pool. Channel error. Worker will be closed");
                    break;
                }
            }
            available_inner.store(false, Ordering::SeqCst);
            debug!("Hasher worker #{id} has been shutdown");
        });
        Self {
            id,
            tx_task,
            available,
            handle: Some(handle),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn delegate(&self, idx: usize, path: PathBuf) -> Result<(), E> {
        self.tx_task
            .send(Task::Hash(idx, path))
            .map_err(|_| E::ChannelClosed)
    }

    pub fn shutdown(&self) {
        if self.is_available() {
            let _ = self.tx_task.send(Task::Shutdown);
        }
    }

    pub fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
