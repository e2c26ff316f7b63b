use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use crate::io::{LocalFileReader, ReadAt};
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{ArchiveEntry, CompressionMethod};

/// Zip archive holding a CSV member
pub struct CsvArchive<R: ReadAt> {
    parser: ZipParser<R>,
}

impl CsvArchive<LocalFileReader> {
    /// Open an archive on the local filesystem
    pub fn open(path: &Path) -> Result<Self> {
        let reader = LocalFileReader::new(path)?;
        Ok(Self::new(Arc::new(reader)))
    }
}

impl<R: ReadAt> CsvArchive<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all members of the archive
    pub async fn list_entries(&self) -> Result<Vec<ArchiveEntry>> {
        self.parser.list_entries().await
    }

    /// First member, in archive order, whose name ends in `.csv`
    pub async fn find_csv_entry(&self) -> Result<ArchiveEntry> {
        let entries = self.list_entries().await?;
        let count = entries.len();
        match entries.into_iter().find(ArchiveEntry::is_csv) {
            Some(entry) => Ok(entry),
            None => bail!("No .csv member among {} archive entries", count),
        }
    }

    /// Decompress a member into memory, checking its size and CRC-32
    pub async fn read_entry(&self, entry: &ArchiveEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            bail!("{} is encrypted", entry.file_name);
        }

        let data_offset = self.parser.get_data_offset(entry).await?;
        if data_offset.saturating_add(entry.compressed_size) > self.parser.reader().size() {
            bail!("{} extends past the end of the archive", entry.file_name);
        }

        let mut compressed = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut compressed)
            .await
            .with_context(|| format!("Reading data of {}", entry.file_name))?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => compressed,
            CompressionMethod::Deflate => {
                // The declared size is untrusted; grow as the stream inflates
                let mut data = Vec::new();
                // One byte past the declared size is enough to detect a mismatch
                DeflateDecoder::new(compressed.as_slice())
                    .take(entry.uncompressed_size + 1)
                    .read_to_end(&mut data)
                    .with_context(|| format!("Inflating {}", entry.file_name))?;
                data
            }
            CompressionMethod::Unknown(_) => bail!(
                "Unsupported compression method: {} (only STORED and DEFLATE are supported)",
                entry.compression_method.as_u16()
            ),
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "Size mismatch for {}: expected {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            );
        }

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            bail!(
                "CRC mismatch for {}: expected {:08x}, got {:08x}",
                entry.file_name,
                entry.crc32,
                crc.sum()
            );
        }

        Ok(data)
    }

    /// Locate the CSV member and return it as a buffered stream
    pub async fn open_csv(&self) -> Result<(ArchiveEntry, Cursor<Vec<u8>>)> {
        let entry = self.find_csv_entry().await?;
        let data = self.read_entry(&entry).await?;
        Ok((entry, Cursor::new(data)))
    }
}
