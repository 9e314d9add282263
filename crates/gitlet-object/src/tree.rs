use std::io::Write;

use bstr::{BStr, BString, ByteSlice};
use gitlet_hash::{HashAlgorithm, ObjectId};

use crate::{ObjectError, ObjectType};

/// Mode of a tree entry.
///
/// Only these four modes exist in a store; anything else in a tree payload is
/// rejected when the tree is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Normal file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Subtree (40000)
    Tree,
}

impl FileMode {
    pub const ALL: [FileMode; 4] = [Self::Regular, Self::Executable, Self::Symlink, Self::Tree];

    /// Parse the exact mode string found in a tree payload.
    ///
    /// The match is byte-for-byte: `040000` is not the same mode as `40000`.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_bytes() == s)
            .ok_or_else(|| ObjectError::UnknownFileMode(BString::from(s)))
    }

    /// The mode string as written in a tree payload.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "100644",
            Self::Executable => "100755",
            Self::Symlink => "120000",
            Self::Tree => "40000",
        }
    }

    pub const fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }

    /// Numeric (octal) value of the mode.
    pub const fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Tree => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// Kind of the object an entry with this mode points at.
    pub fn child_type(&self) -> ObjectType {
        if self.is_tree() {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One named, moded reference to another object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            oid,
        }
    }
}

/// A directory listing.
///
/// Entries keep the order they were given in; encoding never sorts them, so
/// the digest of a tree depends on that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Decode a tree payload whose child digests are `algo.digest_len()` wide.
    ///
    /// Each entry is `<mode> <name>\0<raw digest>`. An empty payload is an
    /// empty tree.
    pub fn parse(content: &[u8], algo: HashAlgorithm) -> Result<Self, ObjectError> {
        let width = algo.digest_len();
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let rest = &content[pos..];
            let space = rest
                .find_byte(b' ')
                .ok_or_else(|| corrupted(pos, "missing space after mode"))?;
            let mode = FileMode::from_bytes(&rest[..space])?;

            let name_start = pos + space + 1;
            let nul = content[name_start..]
                .find_byte(0)
                .ok_or_else(|| corrupted(name_start, "missing NUL after name"))?;
            let name = BString::from(&content[name_start..name_start + nul]);

            let oid_start = name_start + nul + 1;
            let oid_end = oid_start + width;
            if oid_end > content.len() {
                return Err(corrupted(
                    oid_start,
                    format!(
                        "truncated digest: need {width} bytes, {} left",
                        content.len() - oid_start
                    ),
                ));
            }
            let oid = ObjectId::from_bytes(&content[oid_start..oid_end], algo)?;

            entries.push(TreeEntry { mode, name, oid });
            pos = oid_end;
        }

        Ok(Self { entries })
    }

    /// Fail with [`ObjectError::InvalidEntryName`] on the first name holding
    /// a NUL byte; such a payload could not be decoded again.
    pub fn validate(&self) -> Result<(), ObjectError> {
        match self.entries.iter().find(|e| e.name.find_byte(0).is_some()) {
            Some(entry) => Err(ObjectError::InvalidEntryName {
                name: entry.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Encode the payload, entries in their stored order.
    pub fn encode_payload(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// One line per entry: `<mode, 6 wide> <kind> <hex>\t<name>\n`.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            // Writing into a Vec cannot fail.
            let _ = write!(
                out,
                "{:0>6} {} {}\t",
                entry.mode,
                entry.mode.child_type(),
                entry.oid
            );
            out.extend_from_slice(&entry.name);
            out.push(b'\n');
        }
        out
    }

    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn corrupted(offset: usize, reason: impl Into<String>) -> ObjectError {
    ObjectError::CorruptedObject {
        offset,
        reason: reason.into(),
    }
}
