use std::fmt;
use std::str::FromStr;

use crate::hex::{hex_decode, hex_to_string};
use crate::{HashAlgorithm, HashError};

/// Identifier of a stored object: the digest of its canonical encoding.
///
/// The raw digest bytes live inline; the variant records which algorithm
/// produced them, so ids of different widths never compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectId {
    Sha1([u8; 20]),
    Sha256([u8; 32]),
}

impl ObjectId {
    pub const NULL_SHA1: Self = Self::Sha1([0u8; 20]);
    pub const NULL_SHA256: Self = Self::Sha256([0u8; 32]);

    /// Build an id from raw digest bytes, which must be exactly
    /// `algo.digest_len()` long.
    pub fn from_bytes(bytes: &[u8], algo: HashAlgorithm) -> Result<Self, HashError> {
        let invalid = || HashError::InvalidHashLength {
            expected: algo.digest_len(),
            actual: bytes.len(),
        };
        match algo {
            HashAlgorithm::Sha1 => bytes.try_into().map(Self::Sha1).map_err(|_| invalid()),
            HashAlgorithm::Sha256 => bytes.try_into().map(Self::Sha256).map_err(|_| invalid()),
        }
    }

    /// Parse a full hex digest. The algorithm follows from the length:
    /// 40 characters is SHA-1, 64 is SHA-256.
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let algo = HashAlgorithm::from_hex_len(hex.len()).ok_or(HashError::InvalidHexLength {
            expected: HashAlgorithm::default().hex_len(),
            actual: hex.len(),
        })?;
        match algo {
            HashAlgorithm::Sha1 => {
                let mut bytes = [0u8; 20];
                hex_decode(hex, &mut bytes)?;
                Ok(Self::Sha1(bytes))
            }
            HashAlgorithm::Sha256 => {
                let mut bytes = [0u8; 32];
                hex_decode(hex, &mut bytes)?;
                Ok(Self::Sha256(bytes))
            }
        }
    }

    /// Raw digest bytes, the form embedded in tree entries.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Sha1(b) => b,
            Self::Sha256(b) => b,
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Sha1(_) => HashAlgorithm::Sha1,
            Self::Sha256(_) => HashAlgorithm::Sha256,
        }
    }

    pub fn is_null(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex_to_string(self.as_bytes())
    }

    /// Split the hex form into the fan-out directory (first two characters)
    /// and the file name (the rest).
    pub fn fanout_parts(&self) -> (String, String) {
        let mut hex = self.to_hex();
        let rest = hex.split_off(2);
        (hex, rest)
    }

    /// Relative path of the stored object: `"ab/cdef..."`.
    pub fn loose_path(&self) -> String {
        let (dir, file) = self.fanout_parts();
        format!("{dir}/{file}")
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
