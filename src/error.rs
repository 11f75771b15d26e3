use crate::{collector, hasher, sumfile, walker};
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("{0}")]
    Collector(collector::E),
    #[error("{0}")]
    Walker(walker::E),
    #[error("{0}")]
    Hasher(hasher::E),
    #[error("{0}")]
    SumFile(sumfile::E),
    #[error("IO: {0}")]
    IO(#[from] io::Error),
}

impl From<collector::E> for E {
    fn from(err: collector::E) -> Self {
        E::Collector(err)
    }
}

impl From<walker::E> for E {
    fn from(err: walker::E) -> Self {
        E::Walker(err)
    }
}

impl From<hasher::E> for E {
    fn from(err: hasher::E) -> Self {
        E::Hasher(err)
    }
}

impl From<sumfile::E> for E {
    fn from(err: sumfile::E) -> Self {
        E::SumFile(err)
    }
}
