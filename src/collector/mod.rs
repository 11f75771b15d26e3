mod error;
mod pool;
mod worker;

use crate::{breaker::Breaker, walker::Tolerance};
pub use error::E;
use log::{debug, error, warn};
pub use pool::Pool;
use std::{
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver, Sender},
    time::Instant,
};
pub use worker::Worker;

/// Messages from collector workers to `collect()`.
pub enum Action {
    /// A nested folder has been found and should be assigned to a worker.
    Delegate(PathBuf),
    /// A folder has been read. Carries the folder itself, the files found in it and the errors
    /// encountered on the way. Exactly one `Processed` or `Unreadable` is sent per delegated
    /// folder.
    Processed(PathBuf, Vec<PathBuf>, Vec<(PathBuf, E)>),
    /// A folder couldn't be opened at all. Sent instead of `Processed`.
    Unreadable(PathBuf, E),
}

/// A file found under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path (root joined with the relative path).
    pub path: PathBuf,
    /// Number of separators in the path relative to the root; files right in the root have
    /// depth 0.
    pub depth: usize,
}

impl FileEntry {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let depth = path
            .strip_prefix(root)
            .map(|rel| rel.components().count().saturating_sub(1))
            .unwrap_or_default();
        Self { path, depth }
    }
}

/// Collects all regular files beneath `root` using `threads` folder readers.
///
/// Files come back shallow-to-deep; files of equal depth are ordered by path, which is the order
/// a lexical depth-first walk would discover them in. The result is therefore identical between
/// runs no matter how the folders were scheduled between workers.
///
/// With `Tolerance::StopOnErrors` the first unreadable folder or entry aborts collecting; with
/// other levels such paths are skipped. An unreadable `root` is always an error.
pub fn collect(
    root: &Path,
    breaker: &Breaker,
    tolerance: &Tolerance,
    threads: usize,
) -> Result<Vec<FileEntry>, E> {
    let now = Instant::now();
    if !root.exists() {
        return Err(E::NotFound(root.to_path_buf()));
    } else if !root.is_dir() {
        return Err(E::NotFolder(root.to_path_buf()));
    }
    let (tx_queue, rx_queue): (Sender<Action>, Receiver<Action>) = channel();
    let mut workers = Pool::new(threads.max(1), tx_queue, breaker);
    debug!("Created pool with {threads} workers for paths collecting");
    let result = listen(&workers, &rx_queue, root, breaker, tolerance);
    workers.shutdown();
    let mut entries: Vec<FileEntry> = result?
        .into_iter()
        .map(|path| FileEntry::new(root, path))
        .collect();
    entries.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.path.cmp(&b.path)));
    debug!(
        "collected {} files in {}µs / {}ms / {}s; source: {}",
        entries.len(),
        now.elapsed().as_micros(),
        now.elapsed().as_millis(),
        now.elapsed().as_secs(),
        root.display()
    );
    Ok(entries)
}

fn listen(
    workers: &Pool,
    rx_queue: &Receiver<Action>,
    root: &Path,
    breaker: &Breaker,
    tolerance: &Tolerance,
) -> Result<Vec<PathBuf>, E> {
    let mut collected: Vec<PathBuf> = Vec::new();
    workers
        .get()
        .ok_or(E::NoAvailableWorkers)?
        .delegate(root.to_path_buf());
    let mut queue: usize = 1;
    while queue > 0 {
        let action = rx_queue.recv().map_err(|_| E::ChannelClosed)?;
        match action {
            Action::Delegate(folder) => {
                queue += 1;
                workers
                    .get()
                    .ok_or(E::NoAvailableWorkers)?
                    .delegate(folder);
            }
            Action::Processed(_, mut files, errors) => {
                queue -= 1;
                collected.append(&mut files);
                for (path, err) in errors.into_iter() {
                    tolerate(&path, err, breaker, tolerance)?;
                }
            }
            Action::Unreadable(folder, err) => {
                queue -= 1;
                unreadable(root, &folder, err, breaker, tolerance)?;
            }
        }
    }
    if breaker.is_aborted() {
        return Err(E::Aborted);
    }
    Ok(collected)
}

/// Handles a folder which couldn't be opened. Failing to open `root` leaves nothing to collect,
/// so it's returned no matter the tolerance.
fn unreadable(
    root: &Path,
    folder: &Path,
    err: E,
    breaker: &Breaker,
    tolerance: &Tolerance,
) -> Result<(), E> {
    if folder == root {
        error!("root: {}; error: {err}", root.display());
        breaker.abort();
        return Err(err);
    }
    tolerate(folder, err, breaker, tolerance)
}

fn tolerate(path: &Path, err: E, breaker: &Breaker, tolerance: &Tolerance) -> Result<(), E> {
    match tolerance {
        Tolerance::StopOnErrors => {
            error!("entry: {}; error: {err}", path.display());
            breaker.abort();
            Err(err)
        }
        Tolerance::LogErrors => {
            warn!("entry: {}; error: {err}", path.display());
            Ok(())
        }
        Tolerance::DoNotLogErrors => Ok(()),
    }
}
