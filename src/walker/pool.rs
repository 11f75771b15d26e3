use super::{Report, Worker, E};
use std::{
    path::Path,
    slice::Iter,
    sync::{mpsc::Sender, Arc},
};

pub struct Pool {
    workers: Vec<Worker>,
}

impl Pool {
    pub fn new<T, F>(count: usize, tx_queue: Sender<Report<T>>, job: F) -> Self
    where
        T: Send + 'static,
        F: Fn(&Path) -> Result<T, E> + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        let mut workers: Vec<Worker> = Vec::new();
        for id in 0..count {
            workers.push(Worker::run(id, tx_queue.clone(), job.clone()));
        }
        Self { workers }
    }

    pub fn iter(&self) -> Iter<Worker> {
        self.workers.iter()
    }

    pub fn get(&self, id: usize) -> Option<&Worker> {
        self.workers.get(id).filter(|w| w.is_available())
    }

    pub fn shutdown(&mut self) -> &mut Self {
        for worker in self.workers.iter() {
            worker.shutdown();
        }
        self
    }

    pub fn wait(&mut self) {
        for worker in self.workers.iter_mut() {
            worker.wait();
        }
    }
}
