use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Fail to read {0}: {1}")]
    Reading(PathBuf, io::Error),
    #[error("Path {0} cannot be used as root because it isn't folder")]
    NotFolder(PathBuf),
    #[error("Root {0} doesn't exist")]
    NotFound(PathBuf),
    #[error("No available workers")]
    NoAvailableWorkers,
    #[error("Collector workers stopped responding")]
    ChannelClosed,
    #[error("Operation has been aborted")]
    Aborted,
}
