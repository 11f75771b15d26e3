pub mod blake;
pub mod crypto;
mod error;
pub mod quickxor;

pub use error::E;
use std::{fmt, str::FromStr};

/// A trait that defines the behavior of a hasher, which is used to compute the digest of a single
/// file. Implementers of this trait must also implement `Send`, because each instance lives on a
/// worker thread of the hashing pool.
///
/// For each file that needs to be hashed the pool will:
/// - Create a fresh instance with `Algorithm::hasher()`.
/// - Add the file's content chunk by chunk (with method `absorb(..)`).
/// - Finalize the calculation (with method `finish()`).
/// - Request the digest (with method `hash()`).
/// - Drop the instance.
pub trait Hasher: Send {
    /// Absorbs data into the hasher. This method might be called multiple times during the reading
    /// of a file.
    ///
    /// # Parameters
    ///
    /// - `data`: A reference to a slice of bytes to be absorbed by the hasher.
    fn absorb(&mut self, data: &[u8]) -> Result<(), E>;

    /// Finalizes the hashing process. Should be called once, after all data has been absorbed.
    fn finish(&mut self) -> Result<(), E>;

    /// Retrieves the computed digest. Returns `E::NotFinished` if `finish()` wasn't called yet.
    fn hash(&self) -> Result<&[u8], E>;
}

/// Registry of supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Blake3,
    QuickXor,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha512,
        Algorithm::Blake3,
        Algorithm::QuickXor,
    ];

    /// Canonical lower-case identifier, also used as the prefix of the sum file name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
            Self::QuickXor => "quickxorhash",
        }
    }

    /// Name of the sum file for this algorithm, e.g. `md5sum.txt`.
    pub fn sum_file_name(&self) -> String {
        format!("{}sum.txt", self.name())
    }

    /// Creates a fresh streaming accumulator.
    pub fn hasher(&self) -> Box<dyn Hasher> {
        match self {
            Self::Md5 => Box::new(crypto::Crypto::<md5::Md5>::new()),
            Self::Sha1 => Box::new(crypto::Crypto::<sha1::Sha1>::new()),
            Self::Sha256 => Box::new(crypto::Crypto::<sha2::Sha256>::new()),
            Self::Sha512 => Box::new(crypto::Crypto::<sha2::Sha512>::new()),
            Self::Blake3 => Box::new(blake::Blake::new()),
            Self::QuickXor => Box::new(quickxor::QuickXor::new()),
        }
    }

    /// Parses a comma-separated list like `"MD5, sha1"`. Every item is trimmed and matched
    /// case-insensitively; an empty item or an unknown name fails the whole list.
    pub fn parse_list(list: &str) -> Result<Vec<Algorithm>, E> {
        if list.trim().is_empty() {
            return Err(E::EmptyAlgorithmList);
        }
        list.split(',').map(str::parse).collect()
    }
}

impl FromStr for Algorithm {
    type Err = E;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == name)
            .ok_or(E::UnknownAlgorithm(name))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Runs `data` through a fresh hasher of `algorithm` and returns the lower-case hex digest.
pub fn digest_hex(algorithm: Algorithm, data: &[u8]) -> Result<String, E> {
    let mut hasher = algorithm.hasher();
    hasher.absorb(data)?;
    hasher.finish()?;
    Ok(hex::encode(hasher.hash()?))
}
