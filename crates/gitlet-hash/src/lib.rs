//! Digest engine and object identity for the gitlet object store.
//!
//! An [`ObjectId`] is the fixed-width digest of an object's canonical
//! encoding. The width is decided by the store's [`HashAlgorithm`]; the raw
//! bytes are what tree entries embed, the lowercase hex form is what users see.

mod algorithm;
mod error;
pub mod hasher;
pub mod hex;
mod oid;

pub use algorithm::HashAlgorithm;
pub use error::HashError;
pub use oid::ObjectId;
