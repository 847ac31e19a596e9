//! Archive document files with zstd compression.
//!
//! Layout: a 14-byte header (magic, format version, CRC32 of the payload,
//! payload length) followed by a zstd-compressed bincode [`ArchiveDocument`].

use anyhow::{Context, Result};
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::ArchiveRecord;

/// Leading bytes of every archive file.
const ARCHIVE_MAGIC: [u8; 4] = *b"TVAR";

/// Current archive file format version.
pub const ARCHIVE_FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = 14;

/// Host document holding one archive's persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDocument {
    /// Free-form label shown by tooling.
    pub label: String,
    /// The archive section.
    pub archive: ArchiveRecord,
}

impl ArchiveDocument {
    /// Wrap a record.
    pub fn new(label: impl Into<String>, archive: ArchiveRecord) -> Self {
        Self {
            label: label.into(),
            archive,
        }
    }
}

#[derive(Debug, Clone)]
struct ArchiveHeader {
    magic: [u8; 4],
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl ArchiveHeader {
    fn new(crc32: u32, payload_len: u32) -> Self {
        Self {
            magic: ARCHIVE_MAGIC,
            version: ARCHIVE_FORMAT_VERSION,
            crc32,
            payload_len,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);
        bytes.extend_from_slice(&self.magic);
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.crc32.to_le_bytes());
        bytes.extend_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            anyhow::bail!("Archive header too short");
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != ARCHIVE_MAGIC {
            anyhow::bail!(
                "Invalid archive magic: expected {:?}, got {:?}",
                String::from_utf8_lossy(&ARCHIVE_MAGIC),
                String::from_utf8_lossy(&magic)
            );
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version > ARCHIVE_FORMAT_VERSION {
            anyhow::bail!(
                "Unsupported archive format version {} (newest known {})",
                version,
                ARCHIVE_FORMAT_VERSION
            );
        }
        let crc32 = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let payload_len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);

        Ok(Self {
            magic,
            version,
            crc32,
            payload_len,
        })
    }
}

/// On-disk location of one archive document.
#[derive(Debug, Clone)]
pub struct ArchiveFile {
    path: PathBuf,
}

impl ArchiveFile {
    /// Archive file at `path`. Nothing is touched until load or save.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// File path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, or `None` if the file does not exist yet.
    pub fn load(&self) -> Result<Option<ArchiveDocument>> {
        if !self.path.exists() {
            debug!("No archive file at {}", self.path.display());
            return Ok(None);
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut header_bytes = [0u8; HEADER_LEN];
        file.read_exact(&mut header_bytes)
            .context("Failed to read archive header")?;
        let header = ArchiveHeader::from_bytes(&header_bytes)?;

        let file_len = file
            .metadata()
            .with_context(|| format!("Failed to stat {}", self.path.display()))?
            .len();
        let expected_len = HEADER_LEN as u64 + u64::from(header.payload_len);
        if expected_len > file_len {
            anyhow::bail!(
                "Archive payload truncated: header claims {} bytes, file holds {}",
                expected_len,
                file_len
            );
        }

        let mut compressed = vec![0u8; header.payload_len as usize];
        file.read_exact(&mut compressed)
            .context("Failed to read archive payload")?;

        let mut hasher = Hasher::new();
        hasher.update(&compressed);
        let computed_crc = hasher.finalize();

        if computed_crc != header.crc32 {
            anyhow::bail!(
                "CRC32 mismatch: expected {:08X}, got {:08X}",
                header.crc32,
                computed_crc
            );
        }

        let decompressed =
            zstd::decode_all(&compressed[..]).context("Failed to decompress archive")?;
        let document: ArchiveDocument =
            bincode::deserialize(&decompressed).context("Failed to deserialize archive")?;

        info!(
            "Read archive '{}' ({} entries) from {}",
            document.label,
            document.archive.entries.len(),
            self.path.display()
        );
        Ok(Some(document))
    }

    /// Write the document, replacing any previous file atomically.
    pub fn save(&self, document: &ArchiveDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let serialized = bincode::serialize(document).context("Failed to serialize archive")?;

        // Compress with zstd (level 3 for balanced speed/compression).
        let compressed =
            zstd::encode_all(&serialized[..], 3).context("Failed to compress archive")?;

        let mut hasher = Hasher::new();
        hasher.update(&compressed);
        let crc32 = hasher.finalize();

        let payload_len =
            u32::try_from(compressed.len()).context("Archive payload exceeds 4 GiB")?;
        let header = ArchiveHeader::new(crc32, payload_len);

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&tmp_path)
                .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
            file.write_all(&header.to_bytes())
                .context("Failed to write header")?;
            file.write_all(&compressed)
                .context("Failed to write payload")?;
            file.sync_all().context("Failed to flush archive")?;
        }
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(
            "Wrote archive '{}' ({} bytes) to {}",
            document.label,
            HEADER_LEN + compressed.len(),
            self.path.display()
        );
        Ok(())
    }
}
