//! Loose object storage: one zlib-compressed file per object.
//!
//! Each object lives at `objects/XX/YYYY...`, where `XX` is the first two hex
//! characters of its digest and `YYYY...` the rest. The file holds the
//! compressed canonical encoding `"<type> <size>\0<payload>"`. Files are
//! written once and never modified or removed.

mod read;
mod write;

use std::path::{Path, PathBuf};

use gitlet_hash::{HashAlgorithm, ObjectId};
use gitlet_object::{LazyObject, Object, DEFAULT_COMPRESSION_LEVEL};

/// Store-wide settings, fixed when the store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Digest algorithm of every object in the store.
    pub hash_algo: HashAlgorithm,
    /// Zlib level (0-9) for newly written objects.
    pub compression_level: u32,
}

impl StoreConfig {
    pub fn new(hash_algo: HashAlgorithm) -> Self {
        Self {
            hash_algo,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Levels above 9 are clamped to 9.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

/// Interface to the loose object directory.
#[derive(Debug, Clone)]
pub struct LooseObjectStore {
    objects_dir: PathBuf,
    config: StoreConfig,
}

impl LooseObjectStore {
    /// Open the store rooted at `objects_dir`.
    ///
    /// Nothing is touched on disk until the first write; a missing directory
    /// simply contains no objects.
    pub fn open(objects_dir: impl AsRef<Path>, config: StoreConfig) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    pub fn hash_algo(&self) -> HashAlgorithm {
        self.config.hash_algo
    }

    /// Path of the file that holds (or would hold) `oid`.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        let (dir, file) = oid.fanout_parts();
        self.objects_dir.join(dir).join(file)
    }

    /// Wrap `object` with this store's algorithm and compression level.
    pub fn prepare(&self, object: Object) -> LazyObject {
        LazyObject::new(object, self.config.hash_algo)
            .with_compression_level(self.config.compression_level)
    }

    fn ensure_algorithm(&self, actual: HashAlgorithm) -> Result<(), LooseError> {
        if actual != self.config.hash_algo {
            return Err(LooseError::AlgorithmMismatch {
                expected: self.config.hash_algo,
                actual,
            });
        }
        Ok(())
    }
}

/// Errors from loose object operations.
#[derive(Debug, thiserror::Error)]
pub enum LooseError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("corrupt object {oid}: {source}")]
    CorruptStream {
        oid: ObjectId,
        #[source]
        source: gitlet_object::CodecError,
    },

    #[error("hash mismatch for {path}: expected {expected}, got {actual}")]
    HashMismatch {
        path: PathBuf,
        expected: ObjectId,
        actual: ObjectId,
    },

    #[error("digest algorithm mismatch: store uses {expected}, got {actual}")]
    AlgorithmMismatch {
        expected: HashAlgorithm,
        actual: HashAlgorithm,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("compression failed: {0}")]
    Codec(#[from] gitlet_object::CodecError),

    #[error("object parse error: {0}")]
    Object(#[from] gitlet_object::ObjectError),

    #[error("hash error: {0}")]
    Hash(#[from] gitlet_hash::HashError),
}
