use crate::{HashAlgorithm, HashError, ObjectId};

enum State {
    Sha1(Box<sha1_checked::Sha1>),
    Sha256(sha2::Sha256),
}

/// Incremental digest computation.
///
/// SHA-1 runs with collision detection, so finalising can fail. Data is fed
/// with [`update`](Hasher::update) or through [`std::io::Write`].
pub struct Hasher {
    state: State,
}

impl Hasher {
    pub fn new(algo: HashAlgorithm) -> Self {
        use digest::Digest;
        let state = match algo {
            HashAlgorithm::Sha1 => State::Sha1(Box::new(sha1_checked::Sha1::new())),
            HashAlgorithm::Sha256 => State::Sha256(sha2::Sha256::new()),
        };
        Self { state }
    }

    pub fn update(&mut self, data: &[u8]) {
        use digest::Digest;
        match &mut self.state {
            State::Sha1(h) => h.update(data),
            State::Sha256(h) => h.update(data),
        }
    }

    /// Finish hashing.
    ///
    /// Fails with [`HashError::Sha1Collision`] when SHA-1 collision detection
    /// fires.
    pub fn finalize(self) -> Result<ObjectId, HashError> {
        match self.state {
            State::Sha1(h) => {
                let result = h.try_finalize();
                if result.has_collision() {
                    return Err(HashError::Sha1Collision);
                }
                ObjectId::from_bytes(result.hash().as_slice(), HashAlgorithm::Sha1)
            }
            State::Sha256(h) => {
                use digest::Digest;
                ObjectId::from_bytes(h.finalize().as_slice(), HashAlgorithm::Sha256)
            }
        }
    }

    /// Digest `data` in one call.
    pub fn digest(algo: HashAlgorithm, data: &[u8]) -> Result<ObjectId, HashError> {
        let mut h = Self::new(algo);
        h.update(data);
        h.finalize()
    }

    /// Digest the canonical encoding `"<tag> <len>\0<payload>"` without
    /// building it in memory.
    pub fn hash_object(
        algo: HashAlgorithm,
        tag: &str,
        payload: &[u8],
    ) -> Result<ObjectId, HashError> {
        use std::io::Write;
        let mut h = Self::new(algo);
        // Writing into a hasher cannot fail.
        let _ = write!(h, "{tag} {}\0", payload.len());
        h.update(payload);
        h.finalize()
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
