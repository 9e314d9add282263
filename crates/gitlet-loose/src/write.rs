use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use gitlet_hash::ObjectId;
use gitlet_object::{Blob, LazyObject, Object, ObjectType};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{LooseError, LooseObjectStore};

impl LooseObjectStore {
    /// Store an object and return its id.
    ///
    /// Write-once: if a file already exists for the id nothing is written.
    /// The compressed bytes go to a temporary file in the fan-out directory,
    /// which is then linked into place without replacing anything. A
    /// concurrent writer of the same id can win that race; since both wrote
    /// identical bytes, the loser reports success. Stronger exclusion between
    /// processes is up to the caller.
    ///
    /// Fails with [`LooseError::AlgorithmMismatch`] if `obj`, or any digest
    /// referenced by a tree, was made with a different algorithm than the
    /// store's, and with [`ObjectError::InvalidEntryName`] for a tree whose
    /// entry names hold a NUL. Nothing is hashed or written in either case.
    ///
    /// [`ObjectError::InvalidEntryName`]: gitlet_object::ObjectError::InvalidEntryName
    pub fn write(&self, obj: &LazyObject) -> Result<ObjectId, LooseError> {
        self.ensure_algorithm(obj.algorithm())?;
        obj.object().validate()?;
        if let Object::Tree(tree) = obj.object() {
            for entry in tree.iter() {
                self.ensure_algorithm(entry.oid.algorithm())?;
            }
        }

        let oid = obj.oid()?;
        let path = self.object_path(&oid);
        if path.is_file() {
            debug!(%oid, "object already stored");
            return Ok(oid);
        }

        let dir = self.objects_dir.join(oid.fanout_parts().0);
        fs::create_dir_all(&dir)?;

        let compressed = obj.compressed()?;
        let tmp = write_to_temp(&dir, compressed)?;
        if finalize_object(tmp, &path)? {
            debug!(
                %oid,
                kind = %obj.object_type(),
                size = obj.payload().len(),
                compressed = compressed.len(),
                path = %path.display(),
                "object written"
            );
        }
        Ok(oid)
    }

    /// Wrap and store a decoded object.
    pub fn write_object(&self, object: Object) -> Result<ObjectId, LooseError> {
        self.write(&self.prepare(object))
    }

    /// Store a payload of a known kind. Tree payloads are validated first.
    pub fn write_raw(&self, obj_type: ObjectType, payload: &[u8]) -> Result<ObjectId, LooseError> {
        let object = Object::decode_payload(obj_type, payload, self.config.hash_algo)?;
        self.write_object(object)
    }

    pub fn write_blob(&self, data: Vec<u8>) -> Result<ObjectId, LooseError> {
        self.write_object(Object::Blob(Blob::new(data)))
    }

    /// Read `reader` to the end and store it as a blob.
    pub fn write_blob_from(&self, reader: impl Read) -> Result<ObjectId, LooseError> {
        self.write_object(Object::Blob(Blob::from_reader(reader)?))
    }
}

fn write_to_temp(dir: &Path, compressed: &[u8]) -> Result<NamedTempFile, LooseError> {
    let mut tmp = tempfile::Builder::new().prefix("tmp_obj_").tempfile_in(dir)?;
    tmp.write_all(compressed)?;
    tmp.flush()?;

    // Stored objects are read-only (0444) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file().set_permissions(fs::Permissions::from_mode(0o444))?;
    }

    Ok(tmp)
}

/// Move the temp file to `final_path` unless something is already there.
///
/// Returns `false` when another writer got there first; the temp file is
/// removed when `tmp` is dropped.
fn finalize_object(tmp: NamedTempFile, final_path: &Path) -> Result<bool, LooseError> {
    match tmp.persist_noclobber(final_path) {
        Ok(_) => Ok(true),
        Err(err) if final_path.is_file() => {
            debug!(path = %final_path.display(), error = %err.error, "lost creation race");
            Ok(false)
        }
        Err(err) => Err(LooseError::Io(err.error)),
    }
}
