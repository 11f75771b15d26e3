use crate::hasher;
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Fail to read {0}: {1}")]
    Reading(PathBuf, io::Error),
    #[error("Hasher error: {0}")]
    Hasher(hasher::E),
    #[error("Invalid number of threads: {0}; expected 1..={1}")]
    InvalidThreadsNumber(usize, usize),
    #[error("Fail to get optimal threads number")]
    OptimalThreadsNumber,
    #[error("Hashing workers stopped responding")]
    ChannelClosed,
    #[error("Worker panicked while processing {0}")]
    Panicked(PathBuf),
    #[error("Operation has been aborted")]
    Aborted,
    #[error("{0}: {1}")]
    Bound(PathBuf, Box<E>),
}

impl From<hasher::E> for E {
    fn from(err: hasher::E) -> Self {
        E::Hasher(err)
    }
}
