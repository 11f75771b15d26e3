#![doc = include_str!("../README.md")]

mod breaker;
pub mod collector;
mod error;
pub mod hasher;
pub mod runner;
pub mod sumfile;
#[cfg(test)]
pub(crate) mod test;
pub mod walker;

pub use breaker::Breaker;
pub use collector::{collect, FileEntry};
pub use error::E;
pub use hasher::{Algorithm, Hasher};
pub use runner::{hash, verify, HashReport, Summary, VerifyReport};
pub use sumfile::DigestRecord;
pub use walker::{Options, Tolerance, Walker};
