use super::{Action, Worker};
use crate::breaker::Breaker;
use std::sync::mpsc::Sender;

/// Created by the `collect()` function to manage folder readers. Each worker takes a path to a
/// folder and collects paths to files in it. Nested folders are delegated back to `collect()` for
/// further assignment to another worker.
pub struct Pool {
    workers: Vec<Worker>,
}

impl Pool {
    /// Creates a new `Pool` with `count` workers, each bound to its own clone of `tx_queue`.
    pub fn new(count: usize, tx_queue: Sender<Action>, breaker: &Breaker) -> Self {
        let mut workers: Vec<Worker> = Vec::new();
        for _ in 0..count {
            workers.push(Worker::run(tx_queue.clone(), breaker.clone()));
        }
        Self { workers }
    }

    /// Gets an available worker with the least amount of work.
    pub fn get(&self) -> Option<&Worker> {
        self.workers
            .iter()
            .filter(|w| w.is_available())
            .min_by_key(|w| w.count())
    }

    /// Shuts down all workers and waits for their threads.
    pub fn shutdown(&mut self) {
        for worker in self.workers.iter_mut() {
            worker.shutdown();
        }
    }
}
