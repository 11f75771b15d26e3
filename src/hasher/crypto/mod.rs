use super::{Hasher, E};
use sha2::Digest;

/// Hasher for any algorithm of the RustCrypto family (`md-5`, `sha1`, `sha2`).
pub struct Crypto<D: Digest> {
    hasher: Option<D>,
    hash: Option<Vec<u8>>,
}

impl<D: Digest> Default for Crypto<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> Crypto<D> {
    pub fn new() -> Self {
        Crypto {
            hasher: Some(D::new()),
            hash: None,
        }
    }
}

impl<D: Digest + Send> Hasher for Crypto<D> {
    fn hash(&self) -> Result<&[u8], E> {
        Ok(self.hash.as_ref().ok_or(E::NotFinished)?)
    }

    fn absorb(&mut self, data: &[u8]) -> Result<(), E> {
        let Some(hasher) = self.hasher.as_mut() else {
            return Err(E::AlreadyFinished);
        };
        hasher.update(data);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), E> {
        let Some(hasher) = self.hasher.take() else {
            return Err(E::AlreadyFinished);
        };
        self.hash = Some(hasher.finalize().to_vec());
        Ok(())
    }
}
