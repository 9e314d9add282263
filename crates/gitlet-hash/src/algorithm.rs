use std::fmt;
use std::str::FromStr;

use crate::{HashError, ObjectId};

/// Digest algorithm of an object store.
///
/// A store uses exactly one algorithm for its whole lifetime. The algorithm
/// fixes the binary width of every digest, including the ones embedded in
/// tree entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-1, 20 bytes / 40 hex characters.
    #[default]
    Sha1,
    /// SHA-256, 32 bytes / 64 hex characters.
    Sha256,
}

impl HashAlgorithm {
    /// Width of the binary digest in bytes.
    pub const fn digest_len(&self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Width of the hex-rendered digest.
    pub const fn hex_len(&self) -> usize {
        self.digest_len() * 2
    }

    /// The all-zeros id for this algorithm.
    pub const fn null_oid(&self) -> ObjectId {
        match self {
            Self::Sha1 => ObjectId::NULL_SHA1,
            Self::Sha256 => ObjectId::NULL_SHA256,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sha1" | "sha-1" => Some(Self::Sha1),
            "sha256" | "sha-256" => Some(Self::Sha256),
            _ => None,
        }
    }

    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Self::Sha1),
            64 => Some(Self::Sha256),
            _ => None,
        }
    }

    /// Canonical lowercase name, as accepted by [`from_name`](Self::from_name).
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(&s.to_ascii_lowercase())
            .ok_or_else(|| HashError::UnknownAlgorithm(s.to_owned()))
    }
}
