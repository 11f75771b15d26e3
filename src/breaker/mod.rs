use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// `Breaker` is a shared stop flag. The collector checks it between directory entries and the
/// hashing pool checks it before handing out the next file, so raising it stops new work from
/// being scheduled while jobs already in flight are allowed to finish.
///
/// Cloning: a cloned `Breaker` is bound to the same flag as its parent and is safe to share
/// between threads.
#[derive(Default, Debug, Clone)]
pub struct Breaker {
    state: Arc<AtomicBool>,
}

impl Breaker {
    /// Creates a new, not raised `Breaker`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Puts the flag back into its initial state. Used before each pass over a file list.
    pub(crate) fn reset(&self) {
        self.state.store(false, Ordering::SeqCst)
    }

    /// Checks whether the operation has been aborted.
    pub fn is_aborted(&self) -> bool {
        self.state.load(Ordering::SeqCst)
    }

    /// Raises the flag.
    pub fn abort(&self) {
        self.state.store(true, Ordering::SeqCst)
    }
}
