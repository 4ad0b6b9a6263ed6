use std::io::{Cursor, Read, Write};
use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::DocxError;

// @module: Zip container of a word-processing document

/// Name of the main document part inside the package
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

/// Single zip entry with its original compression
#[derive(Debug, Clone)]
pub struct PackageEntry {
    /// Entry name inside the archive
    pub name: String,

    /// Compression used when the entry was read
    pub compression: CompressionMethod,

    /// Uncompressed bytes
    pub data: Vec<u8>,
}

/// An opened `.docx` package.
///
/// Entries keep their archive order and compression method so that a
/// package written back differs from the input only in the parts that
/// were replaced.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    /// Read a package from raw zip bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocxError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            let compression = entry.compression();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            entries.push(PackageEntry { name, compression, data });
        }

        debug!("Read {} package entries", entries.len());

        Ok(Self { entries })
    }

    /// Build a package from (name, bytes) pairs, all deflated
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let entries = parts
            .into_iter()
            .map(|(name, data)| PackageEntry {
                name: name.into(),
                compression: CompressionMethod::Deflated,
                data,
            })
            .collect();

        Self { entries }
    }

    /// Serialize the package back to zip bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocxError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let options = SimpleFileOptions::default().compression_method(entry.compression);
            if entry.name.ends_with('/') {
                zip.add_directory(entry.name.as_str(), options)?;
            } else {
                zip.start_file(entry.name.as_str(), options)?;
                zip.write_all(&entry.data)?;
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Entries in archive order
    pub fn entries(&self) -> &[PackageEntry] {
        &self.entries
    }

    /// Bytes of a named part
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Bytes of a named part, or `MissingPart`
    pub fn require_part(&self, name: &str) -> Result<&[u8], DocxError> {
        self.part(name)
            .ok_or_else(|| DocxError::MissingPart(name.to_string()))
    }

    /// Replace the contents of an existing part, keeping its position and compression
    pub fn replace_part(&mut self, name: &str, data: Vec<u8>) -> Result<(), DocxError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| DocxError::MissingPart(name.to_string()))?;
        entry.data = data;
        Ok(())
    }

    /// Main document XML as text
    pub fn main_document_xml(&self) -> Result<&str, DocxError> {
        let bytes = self.require_part(MAIN_DOCUMENT_PART)?;
        std::str::from_utf8(bytes).map_err(|_| DocxError::Encoding(MAIN_DOCUMENT_PART.to_string()))
    }
}
