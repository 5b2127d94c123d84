//! crates/signature/src/writer.rs
//!
//! Serialisation of signature vectors.
//!
//! A signature file is a flat sequence of native-endian `u32` checksums in
//! block order: no header, no separators, no trailer.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::error::SignatureError;
use crate::file::FileSignature;

/// Width in bytes of one serialised checksum.
pub const CHECKSUM_WIDTH: usize = size_of::<u32>();

/// Error returned when decoding a signature whose length is not a multiple of
/// [`CHECKSUM_WIDTH`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("signature length {len} is not a multiple of {width} bytes", width = CHECKSUM_WIDTH)]
pub struct MalformedSignature {
    len: usize,
}

impl MalformedSignature {
    /// Length of the rejected input in bytes.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        self.len
    }
}

/// Appends `suffix` to the file name of `base`.
///
/// A base without a final component (for example `..`) is resolved against
/// the current directory first, so the suffix never lands inside `base`.
#[must_use]
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = if base.file_name().is_none() && !base.as_os_str().is_empty() {
        let mut relative = OsString::from("./");
        relative.push(base.as_os_str());
        relative
    } else {
        base.as_os_str().to_owned()
    };
    path.push(suffix);
    PathBuf::from(path)
}

/// Writes the checksums of `signature` to `writer` in block order.
pub fn write_signature<W: Write>(signature: &FileSignature, writer: W) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for checksum in signature.checksums() {
        writer.write_all(&checksum.to_ne_bytes())?;
    }
    writer.flush()
}

/// Creates (or truncates) `path` and writes `signature` into it.
///
/// A partially written file is removed before the error is returned.
pub fn write_signature_file(path: &Path, signature: &FileSignature) -> Result<(), SignatureError> {
    let file = File::create(path).map_err(|source| SignatureError::io("create", path, source))?;

    let result = write_signature(signature, &file).and_then(|()| file.sync_all());
    if let Err(source) = result {
        drop(file);
        if let Err(remove) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %remove, "failed to remove partial signature file");
        }
        return Err(SignatureError::io("write", path, source));
    }

    info!(path = %path.display(), blocks = signature.len(), "signature written");
    Ok(())
}

/// Decodes a serialised signature back into checksums.
pub fn decode_signature(bytes: &[u8]) -> Result<Vec<u32>, MalformedSignature> {
    if bytes.len() % CHECKSUM_WIDTH != 0 {
        return Err(MalformedSignature { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(CHECKSUM_WIDTH)
        .map(|chunk| {
            let mut word = [0u8; CHECKSUM_WIDTH];
            word.copy_from_slice(chunk);
            u32::from_ne_bytes(word)
        })
        .collect())
}
