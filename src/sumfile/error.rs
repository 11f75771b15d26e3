use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Fail to access sum file {0}: {1}")]
    IO(PathBuf, io::Error),
    #[error("Malformed line {line}: \"{content}\"; expected \"<digest> <path>\"")]
    Parse { line: usize, content: String },
    #[error("Line {line} refers to {path}, which is outside of the root")]
    OutsideOfRoot { line: usize, path: String },
    #[error("Path {0} isn't located under the root")]
    NotUnderRoot(PathBuf),
    #[error("Path {0} isn't valid UTF-8 and cannot be recorded")]
    NotUnicode(PathBuf),
}
