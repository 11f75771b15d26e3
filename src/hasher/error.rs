use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Unsupported algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("Algorithm list is empty")]
    EmptyAlgorithmList,
    #[error("Hashing not finished")]
    NotFinished,
    #[error("Hashing already finished")]
    AlreadyFinished,
}
