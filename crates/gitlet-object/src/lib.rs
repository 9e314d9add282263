//! Object model of the gitlet store: blobs and trees, their canonical
//! encoding, and the zlib envelope used to persist them.
//!
//! Every object encodes to `"<tag> <payload-len>\0<payload>"`. That encoding
//! is what gets digested; [`LazyObject`] caches it together with the digest
//! and the compressed form.

mod blob;
pub mod header;
mod lazy;
mod tree;
pub mod zlib;

pub use blob::Blob;
pub use lazy::{LazyObject, DEFAULT_COMPRESSION_LEVEL};
pub use tree::{FileMode, Tree, TreeEntry};
pub use zlib::CodecError;

use bstr::BString;
use gitlet_hash::{HashAlgorithm, HashError, ObjectId};

/// Errors produced while decoding objects.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("corrupted object header: {0}")]
    CorruptedHeader(String),

    #[error("object size mismatch: header declares {declared} bytes, payload has {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("unknown object type: {0}")]
    UnknownObjectType(BString),

    #[error("unknown file mode: {0}")]
    UnknownFileMode(BString),

    #[error("invalid tree entry name {name:?}: contains NUL")]
    InvalidEntryName { name: BString },

    #[error("corrupted object at offset {offset}: {reason}")]
    CorruptedObject { offset: usize, reason: String },

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Object kinds known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
}

impl ObjectType {
    /// Parse a header tag.
    pub fn from_bytes(tag: &[u8]) -> Result<Self, ObjectError> {
        match tag {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            _ => Err(ObjectError::UnknownObjectType(BString::from(tag))),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        }
    }

    pub const fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
}

impl Object {
    /// Decode a canonical encoding. `algo` fixes the width of the digests
    /// inside tree payloads.
    ///
    /// Checks, in order: header structure, declared size against the actual
    /// payload length, the tag, then the payload itself.
    pub fn decode(data: &[u8], algo: HashAlgorithm) -> Result<Self, ObjectError> {
        let hdr = header::parse_header(data)?;
        let payload = &data[hdr.len..];
        if hdr.size != payload.len() {
            return Err(ObjectError::SizeMismatch {
                declared: hdr.size,
                actual: payload.len(),
            });
        }
        Self::decode_payload(ObjectType::from_bytes(hdr.tag)?, payload, algo)
    }

    /// Decode a payload of a known kind (no header).
    pub fn decode_payload(
        obj_type: ObjectType,
        payload: &[u8],
        algo: HashAlgorithm,
    ) -> Result<Self, ObjectError> {
        match obj_type {
            ObjectType::Blob => Ok(Self::Blob(Blob::parse(payload))),
            ObjectType::Tree => Ok(Self::Tree(Tree::parse(payload, algo)?)),
        }
    }

    /// The canonical encoding: header followed by payload.
    pub fn encode(&self) -> Vec<u8> {
        let payload = self.encode_payload();
        let hdr = header::write_header(self.object_type(), payload.len());
        let mut out = Vec::with_capacity(hdr.len() + payload.len());
        out.extend_from_slice(&hdr);
        out.extend_from_slice(&payload);
        out
    }

    pub fn encode_payload(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.payload().to_vec(),
            Self::Tree(t) => t.encode_payload(),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Blob(_) => ObjectType::Blob,
            Self::Tree(_) => ObjectType::Tree,
        }
    }

    /// Digest of the canonical encoding. Prefer [`LazyObject::oid`] when the
    /// id is needed more than once.
    pub fn compute_oid(&self, algo: HashAlgorithm) -> Result<ObjectId, HashError> {
        gitlet_hash::hasher::Hasher::hash_object(
            algo,
            self.object_type().as_str(),
            &self.encode_payload(),
        )
    }

    /// Check that the object can be encoded and decoded back. Blobs always
    /// can; trees need NUL-free entry names.
    pub fn validate(&self) -> Result<(), ObjectError> {
        match self {
            Self::Blob(_) => Ok(()),
            Self::Tree(t) => t.validate(),
        }
    }

    /// Display form: a blob's bytes verbatim, a tree's entry listing.
    pub fn render(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.payload().to_vec(),
            Self::Tree(t) => t.render(),
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Self::Blob(b) => Some(b),
            Self::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(t) => Some(t),
            Self::Blob(_) => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}
