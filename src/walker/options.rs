use super::{Walker, E};

/// Upper limit of hashing threads as a multiplier of available cores.
pub const MAX_THREADS_MLT_TO_CORES: usize = 64;

/// What to do when a single file (or folder during collecting) cannot be processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Tolerance {
    /// Keep going; the error is logged as a warning and kept next to the path.
    LogErrors,
    /// Keep going silently; the error is kept next to the path.
    DoNotLogErrors,
    /// Stop scheduling new work, wait for jobs in flight and return the first error.
    #[default]
    StopOnErrors,
}

#[derive(Default, Debug, Clone)]
pub struct Options {
    pub(crate) tolerance: Tolerance,
    pub(crate) threads: Option<usize>,
    pub(crate) verbose: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of files hashed at the same time. By default equal to the number of
    /// logical cores.
    pub fn threads(&mut self, threads: usize) -> &mut Self {
        self.threads = Some(threads);
        self
    }

    pub fn tolerance(&mut self, tolerance: Tolerance) -> &mut Self {
        self.tolerance = tolerance;
        self
    }

    /// Log every processed file instead of only findings.
    pub fn verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    pub fn walker(&self) -> Result<Walker, E> {
        Walker::new(self.clone())
    }
}
