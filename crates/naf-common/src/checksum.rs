//! SHA-256 digests for generated fragments

use crate::error::Result;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Digest of a file plus the number of bytes hashed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub sha256: String,
    pub bytes: u64,
}

/// Compute the hex SHA-256 digest of a file
pub fn file_digest(path: impl AsRef<Path>) -> Result<FileDigest> {
    let mut file = std::fs::File::open(path)?;
    reader_digest(&mut file)
}

/// Compute the hex SHA-256 digest of any readable source
pub fn reader_digest<R: Read>(reader: &mut R) -> Result<FileDigest> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut bytes = 0u64;

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        bytes += read as u64;
    }

    Ok(FileDigest {
        sha256: hex::encode(hasher.finalize()),
        bytes,
    })
}
