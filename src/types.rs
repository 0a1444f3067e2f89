//! Core identifier and mode types shared across the crate.

use crate::error::LsTreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a git object id in bytes (SHA-1).
pub const OBJECT_ID_LEN: usize = 20;

/// Git object identifier (content identifier of a blob, tree or commit)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// The all-zero id carried by sentinel entries.
    pub const ZERO: ObjectId = ObjectId([0u8; OBJECT_ID_LEN]);

    pub fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 40 character hex id.
    pub fn from_hex(s: &str) -> Result<Self, LsTreeError> {
        if s.len() != OBJECT_ID_LEN * 2 {
            return Err(LsTreeError::InvalidArgument(format!(
                "invalid object id {:?}: expected {} hex characters, got {}",
                s,
                OBJECT_ID_LEN * 2,
                s.len()
            )));
        }

        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| {
            LsTreeError::InvalidArgument(format!("invalid object id {:?}: {}", s, e))
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.0
    }

    /// Lowercase hex rendering, the canonical text form fed into checksums.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; OBJECT_ID_LEN]
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl From<git2::Oid> for ObjectId {
    fn from(oid: git2::Oid) -> Self {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        let raw = oid.as_bytes();
        let len = raw.len().min(OBJECT_ID_LEN);
        bytes[..len].copy_from_slice(&raw[..len]);
        Self(bytes)
    }
}

/// Type tag of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    Regular,
    Executable,
    Symlink,
    Directory,
    Submodule,
    /// Sentinel for entries that were looked up but not found.
    Empty,
}

impl EntryMode {
    /// Map a git file mode to an entry type. Unknown modes yield `None`.
    pub fn from_git_mode(mode: u32) -> Option<Self> {
        match mode {
            0o100644 | 0o100664 | 0o100600 => Some(EntryMode::Regular),
            0o100755 => Some(EntryMode::Executable),
            0o120000 => Some(EntryMode::Symlink),
            0o040000 => Some(EntryMode::Directory),
            0o160000 => Some(EntryMode::Submodule),
            0 => Some(EntryMode::Empty),
            _ => None,
        }
    }

    pub fn git_mode(&self) -> u32 {
        match self {
            EntryMode::Regular => 0o100644,
            EntryMode::Executable => 0o100755,
            EntryMode::Symlink => 0o120000,
            EntryMode::Directory => 0o040000,
            EntryMode::Submodule => 0o160000,
            EntryMode::Empty => 0,
        }
    }

    /// Entries whose content is a blob in the owning repository.
    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            EntryMode::Regular | EntryMode::Executable | EntryMode::Symlink
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Regular => "file",
            EntryMode::Executable => "executable",
            EntryMode::Symlink => "symlink",
            EntryMode::Directory => "dir",
            EntryMode::Submodule => "submodule",
            EntryMode::Empty => "empty",
        }
    }
}

impl fmt::Display for EntryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
