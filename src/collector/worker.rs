use super::{Action, E};

use crate::breaker::Breaker;
use log::{debug, error};
use std::{
    fs::{metadata, read_dir},
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc::{channel, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

/// Messages from `collect()` to `Worker`.
enum Task {
    /// Read a folder and collect paths to files.
    Read(PathBuf),
    /// Break the listening loop of the `Worker`. Once `Shutdown` has been sent, the `Worker`
    /// cannot be reused.
    Shutdown,
}

/// `Worker` reads one folder per task on its own thread. Nested folders are not read by the same
/// worker; they are sent back to `collect()` as `Action::Delegate` to be assigned to the least
/// loaded worker.
///
/// Error handling: `Worker` doesn't stop on IO errors. Errors are reported together with the
/// folder's result and `collect()` decides what to do based on the tolerance level.
pub struct Worker {
    tx_task: Sender<Task>,
    queue: Arc<AtomicUsize>,
    available: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn run(tx_queue: Sender<Action>, breaker: Breaker) -> Self {
        let (tx_task, rx_task): (Sender<Task>, Receiver<Task>) = channel();
        let queue = Arc::new(AtomicUsize::new(0));
        let available: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
        let available_inner = available.clone();
        let queue_inner = queue.clone();
        let handle = thread::spawn(move || {
            let send = |action: Action| {
                tx_queue.send(action).inspect_err(|_err| {
                    error!(
                        "Worker cannot communicate with collector. Channel error. Worker will be closed"
                    )
                })
            };
            let response = |action: Action| {
                queue_inner.fetch_sub(1, Ordering::SeqCst);
                send(action)
            };
            'outer: while let Ok(task) = rx_task.recv() {
                let folder = match task {
                    Task::Read(folder) => folder,
                    Task::Shutdown => break 'outer,
                };
                let els = match read_dir(&folder) {
                    Ok(els) => els,
                    Err(err) => {
                        let err = E::Reading(folder.clone(), err);
                        if response(Action::Unreadable(folder, err)).is_err() {
                            break 'outer;
                        }
                        continue;
                    }
                };
                let mut files: Vec<PathBuf> = Vec::new();
                let mut errors: Vec<(PathBuf, E)> = Vec::new();
                for el in els {
                    if breaker.is_aborted() {
                        break;
                    }
                    let el = match el {
                        Ok(el) => el,
                        Err(err) => {
                            errors.push((folder.clone(), E::Reading(folder.clone(), err)));
                            continue;
                        }
                    };
                    let path = el.path();
                    let file_type = match el.file_type() {
                        Ok(file_type) => file_type,
                        Err(err) => {
                            errors.push((path.clone(), E::Reading(path, err)));
                            continue;
                        }
                    };
                    if file_type.is_dir() {
                        if send(Action::Delegate(path)).is_err() {
                            break 'outer;
                        }
                    } else if file_type.is_file() {
                        files.push(path);
                    } else if file_type.is_symlink() {
                        // Links are listed under their own path; linked folders aren't followed.
                        match metadata(&path) {
                            Ok(md) if md.is_file() => files.push(path),
                            Ok(_) => debug!("{} doesn't link to a file; ignored", path.display()),
                            Err(err) => debug!("{} is a dangling link ({err}); ignored", path.display()),
                        }
                    } else {
                        debug!("{} isn't a regular file; ignored", path.display());
                    }
                }
                if response(Action::Processed(folder, files, errors)).is_err() {
                    break 'outer;
                }
            }
            available_inner.store(false, Ordering::SeqCst);
        });
        Self {
            tx_task,
            queue,
            available,
            handle: Some(handle),
        }
    }

    /// Returns the number of folders waiting in the worker's queue.
    pub fn count(&self) -> usize {
        self.queue.load(Ordering::SeqCst)
    }

    /// Checks if the worker is still listening for tasks.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Delegates a folder to the worker.
    pub fn delegate(&self, folder: PathBuf) {
        self.queue.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx_task.send(Task::Read(folder));
    }

    /// Sends `Shutdown` and waits for the thread. Tasks queued before `Shutdown` are still
    /// processed.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.tx_task.send(Task::Shutdown);
            let _ = handle.join();
        }
    }
}
