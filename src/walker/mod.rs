mod error;
pub(crate) mod options;
mod pool;
mod worker;

use crate::{breaker::Breaker, hasher::Algorithm};
pub use error::E;
use log::{debug, error, warn};
pub use options::{Options, Tolerance};
use pool::Pool;
use std::{
    fs::File,
    io::{ErrorKind, Read},
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};
pub use worker::Worker;

/// Files are read and absorbed in chunks of this size.
pub const BUFFER_SIZE: usize = 1024 * 1024;

/// Result of one job as reported by a worker: worker's id, index of the file in the input list
/// and the outcome.
pub type Report<T> = (usize, usize, Result<T, E>);

/// `Walker` runs a per-file job over a list of paths with bounded parallelism.
///
/// Results come back in the order of the input list: every worker reports the index of the file
/// it has processed and the result lands in a pre-sized slot with that index, so completion order
/// doesn't matter. At most `threads` jobs run at the same time, because each worker holds one
/// file and gets the next one only after reporting the previous.
///
/// `run()` returns only after every delegated job has finished.
#[derive(Debug)]
pub struct Walker {
    opt: Options,
    threads: usize,
    breaker: Breaker,
}

impl Walker {
    /// Creates a new `Walker`. Fails if the configured number of threads is `0` or unreasonably
    /// large for this machine.
    pub fn new(opt: Options) -> Result<Self, E> {
        let cores = thread::available_parallelism()
            .ok()
            .map(|n| n.get())
            .ok_or(E::OptimalThreadsNumber)?;
        let max = cores * options::MAX_THREADS_MLT_TO_CORES;
        let threads = opt.threads.unwrap_or(cores);
        if threads == 0 || threads > max {
            return Err(E::InvalidThreadsNumber(threads, max));
        }
        Ok(Self {
            opt,
            threads,
            breaker: Breaker::new(),
        })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.opt.tolerance
    }

    pub fn is_verbose(&self) -> bool {
        self.opt.verbose
    }

    /// `Breaker` shared by all passes of this `Walker`. Raising it stops handing out files; jobs
    /// in flight are finished and `run()` returns `E::Aborted`.
    pub fn breaker(&self) -> Breaker {
        self.breaker.clone()
    }

    /// Computes the digest of every file in `paths` with `algorithm`. The i-th result belongs to
    /// the i-th path.
    pub fn hash(
        &self,
        paths: Vec<PathBuf>,
        algorithm: Algorithm,
    ) -> Result<Vec<Result<String, E>>, E> {
        self.run(paths, move |path: &Path| hash_file(path, algorithm))
    }

    /// Applies `job` to every path. The i-th result belongs to the i-th path.
    ///
    /// # Errors
    ///
    /// With `Tolerance::StopOnErrors` the first failed job stops delegation, jobs in flight are
    /// awaited and the error is returned bound to its path. With other tolerance levels failed
    /// jobs stay in their slots as `Err`.
    pub fn run<T, F>(&self, paths: Vec<PathBuf>, job: F) -> Result<Vec<Result<T, E>>, E>
    where
        T: Send + 'static,
        F: Fn(&Path) -> Result<T, E> + Send + Sync + 'static,
    {
        let now = Instant::now();
        let total = paths.len();
        if total == 0 {
            return Ok(Vec::new());
        }
        self.breaker.reset();
        let threads = self.threads.min(total);
        let (tx_queue, rx_queue): (Sender<Report<T>>, Receiver<Report<T>>) = channel();
        let mut pool = Pool::new(threads, tx_queue, job);
        debug!("Created pool with {threads} workers for hashing");
        let mut slots: Vec<Option<Result<T, E>>> = (0..total).map(|_| None).collect();
        let mut failure: Option<(usize, E)> = None;
        let outcome = self.dispatch(&pool, &rx_queue, &paths, &mut slots, &mut failure);
        pool.shutdown().wait();
        outcome?;
        if let Some((idx, err)) = failure {
            return Err(bind(&paths[idx], err));
        }
        if self.breaker.is_aborted() {
            return Err(E::Aborted);
        }
        debug!(
            "processed {} paths in {}µs / {}ms / {}s",
            total,
            now.elapsed().as_micros(),
            now.elapsed().as_millis(),
            now.elapsed().as_secs()
        );
        slots
            .into_iter()
            .map(|slot| slot.ok_or(E::Aborted))
            .collect()
    }

    fn dispatch<T>(
        &self,
        pool: &Pool,
        rx_queue: &Receiver<Report<T>>,
        paths: &[PathBuf],
        slots: &mut [Option<Result<T, E>>],
        failure: &mut Option<(usize, E)>,
    ) -> Result<(), E> {
        let mut pending = paths.iter().cloned().enumerate();
        let mut in_flight: usize = 0;
        for worker in pool.iter() {
            let Some((idx, path)) = pending.next() else {
                break;
            };
            worker.delegate(idx, path)?;
            in_flight += 1;
        }
        while in_flight > 0 {
            let (worker_id, idx, result) = rx_queue.recv().map_err(|_| E::ChannelClosed)?;
            in_flight -= 1;
            slots[idx] = match result {
                Err(err) => {
                    let path = &paths[idx];
                    match self.opt.tolerance {
                        Tolerance::StopOnErrors if failure.is_none() => {
                            error!("entry: {}; error: {err}", path.display());
                            self.breaker.abort();
                            // The first failure is kept aside; its slot stays empty.
                            *failure = Some((idx, err));
                            None
                        }
                        Tolerance::StopOnErrors | Tolerance::DoNotLogErrors => Some(Err(err)),
                        Tolerance::LogErrors => {
                            warn!("entry: {}; error: {err}", path.display());
                            Some(Err(err))
                        }
                    }
                }
                ok => Some(ok),
            };
            if self.breaker.is_aborted() {
                continue;
            }
            if let Some((next, path)) = pending.next() {
                pool.get(worker_id)
                    .ok_or(E::ChannelClosed)?
                    .delegate(next, path)?;
                in_flight += 1;
            }
        }
        Ok(())
    }
}

fn bind(path: &Path, err: E) -> E {
    match err {
        E::Reading(..) | E::Panicked(..) | E::Bound(..) => err,
        err => E::Bound(path.to_path_buf(), Box::new(err)),
    }
}

/// Reads the file in `BUFFER_SIZE` chunks, feeds every chunk to a fresh hasher of `algorithm` and
/// returns the lower-case hex digest. The file is closed on every exit path.
pub fn hash_file(path: &Path, algorithm: Algorithm) -> Result<String, E> {
    let mut file = File::open(path).map_err(|err| E::Reading(path.to_path_buf(), err))?;
    let mut hasher = algorithm.hasher();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(E::Reading(path.to_path_buf(), err)),
        };
        hasher.absorb(&buffer[..read])?;
    }
    hasher.finish()?;
    Ok(hex::encode(hasher.hash()?))
}
