use std::fs;
use std::io::ErrorKind;

use gitlet_hash::hasher::Hasher;
use gitlet_hash::ObjectId;
use gitlet_object::{zlib, LazyObject};
use tracing::trace;

use crate::{LooseError, LooseObjectStore};

impl LooseObjectStore {
    /// Check if an object is stored.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Load an object by id.
    ///
    /// Fails with [`LooseError::NotFound`] if nothing is stored under `oid`,
    /// [`LooseError::CorruptStream`] if the file is not a valid zlib stream,
    /// and [`LooseError::Object`] if the inflated bytes do not decode.
    pub fn read(&self, oid: &ObjectId) -> Result<LazyObject, LooseError> {
        let encoded = self.read_encoded(oid)?;
        self.decode(encoded)
    }

    /// Like [`read`](Self::read), but also rehash the inflated bytes and fail
    /// with [`LooseError::HashMismatch`] if they do not hash to `oid`.
    pub fn read_verified(&self, oid: &ObjectId) -> Result<LazyObject, LooseError> {
        let encoded = self.read_encoded(oid)?;
        let actual = Hasher::digest(self.config.hash_algo, &encoded)?;
        if actual != *oid {
            return Err(LooseError::HashMismatch {
                path: self.object_path(oid),
                expected: *oid,
                actual,
            });
        }
        self.decode(encoded)
    }

    /// Read and inflate the stored file, without decoding it.
    fn read_encoded(&self, oid: &ObjectId) -> Result<Vec<u8>, LooseError> {
        self.ensure_algorithm(oid.algorithm())?;
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LooseError::NotFound(*oid)),
            Err(e) => return Err(LooseError::Io(e)),
        };

        let encoded = zlib::decompress(&compressed)
            .map_err(|source| LooseError::CorruptStream { oid: *oid, source })?;
        trace!(%oid, compressed = compressed.len(), inflated = encoded.len(), "object read");
        Ok(encoded)
    }

    fn decode(&self, encoded: Vec<u8>) -> Result<LazyObject, LooseError> {
        Ok(LazyObject::decode(encoded, self.config.hash_algo)?
            .with_compression_level(self.config.compression_level))
    }
}
