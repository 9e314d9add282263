use std::sync::OnceLock;

use gitlet_hash::hasher::Hasher;
use gitlet_hash::{HashAlgorithm, HashError, ObjectId};

use crate::zlib::{self, CodecError};
use crate::{header, Object, ObjectError, ObjectType};

/// Default zlib level, same as `flate2::Compression::default()`.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// An [`Object`] bound to a digest algorithm, with its canonical encoding,
/// digest and compressed form each computed at most once.
///
/// The wrapped object is only reachable through `&self`, so the caches can
/// never go stale.
#[derive(Debug, Clone)]
pub struct LazyObject {
    object: Object,
    algo: HashAlgorithm,
    level: u32,
    encoded: OnceLock<Vec<u8>>,
    oid: OnceLock<ObjectId>,
    compressed: OnceLock<Vec<u8>>,
}

impl LazyObject {
    pub fn new(object: Object, algo: HashAlgorithm) -> Self {
        Self {
            object,
            algo,
            level: DEFAULT_COMPRESSION_LEVEL,
            encoded: OnceLock::new(),
            oid: OnceLock::new(),
            compressed: OnceLock::new(),
        }
    }

    /// Decode a canonical encoding, keeping `encoded` as the cached encoding
    /// so the bytes are never rebuilt.
    pub fn decode(encoded: Vec<u8>, algo: HashAlgorithm) -> Result<Self, ObjectError> {
        let object = Object::decode(&encoded, algo)?;
        let lazy = Self::new(object, algo);
        let _ = lazy.encoded.set(encoded);
        Ok(lazy)
    }

    /// Zlib level used by [`compressed`](Self::compressed). Has no effect
    /// once the compressed form has been computed.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn object(&self) -> &Object {
        &self.object
    }

    pub fn into_object(self) -> Object {
        self.object
    }

    pub fn object_type(&self) -> ObjectType {
        self.object.object_type()
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algo
    }

    /// The canonical encoding `"<tag> <len>\0<payload>"`.
    pub fn encoded(&self) -> &[u8] {
        self.encoded.get_or_init(|| self.object.encode())
    }

    /// The payload portion of the encoding.
    pub fn payload(&self) -> &[u8] {
        let encoded = self.encoded();
        header::strip_header(encoded).unwrap_or(encoded)
    }

    pub fn oid(&self) -> Result<ObjectId, HashError> {
        if let Some(oid) = self.oid.get() {
            return Ok(*oid);
        }
        let oid = Hasher::digest(self.algo, self.encoded())?;
        Ok(*self.oid.get_or_init(|| oid))
    }

    /// Hex form of [`oid`](Self::oid).
    pub fn digest(&self) -> Result<String, HashError> {
        self.oid().map(|oid| oid.to_hex())
    }

    /// The zlib-compressed encoding, as written to disk.
    pub fn compressed(&self) -> Result<&[u8], CodecError> {
        if let Some(bytes) = self.compressed.get() {
            return Ok(bytes);
        }
        let bytes = zlib::compress(self.encoded(), self.level)?;
        Ok(self.compressed.get_or_init(|| bytes))
    }

    pub fn render(&self) -> Vec<u8> {
        self.object.render()
    }
}

impl From<LazyObject> for Object {
    fn from(lazy: LazyObject) -> Self {
        lazy.object
    }
}
