//! Entry sources for the collection reader.
//!
//! The collection reader only needs an ordered list of named byte streams.
//! This module supplies that list from the places ROI sets usually live:
//! a zip archive written by the ROI manager, or a directory of `.roi`
//! files. Every member is read fully into memory and the underlying file
//! handle is closed before any decoding happens.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::RoiError;
use crate::roi::RoiSource;

const ROI_FILE_EXTENSION: &str = "roi";
const ZIP_FILE_EXTENSION: &str = "zip";

/// Upper bound on the buffer reserved from a member's declared size.
const MAX_MEMBER_PREALLOC: u64 = 1 << 20;

/// One named byte stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Member name (zip) or path relative to the scanned directory.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RoiSource for ArchiveEntry {
    fn entry_name(&self) -> &str {
        &self.name
    }

    fn entry_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A zip member as seen in listing-only mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ZipListing {
    pub name: String,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

/// Reads every file member of a zip archive, in archive order.
///
/// Directory members are skipped. Members are not filtered by extension;
/// a non-ROI member surfaces as a decode error from the collection reader.
pub fn read_zip_entries(path: &Path) -> Result<Vec<ArchiveEntry>, RoiError> {
    let mut archive = open_zip(path)?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut member = archive
            .by_index(index)
            .map_err(|source| RoiError::ZipEntry {
                path: path.to_path_buf(),
                index,
                message: source.to_string(),
            })?;
        if member.is_dir() {
            continue;
        }

        let name = member.name().to_string();
        let mut bytes = Vec::with_capacity(member.size().min(MAX_MEMBER_PREALLOC) as usize);
        member
            .read_to_end(&mut bytes)
            .map_err(|source| RoiError::ZipEntry {
                path: path.to_path_buf(),
                index,
                message: format!("'{name}': {source}"),
            })?;

        debug!(member = name.as_str(), bytes = bytes.len(), "read zip member");
        entries.push(ArchiveEntry { name, bytes });
    }

    Ok(entries)
}

/// Lists the file members of a zip archive without decompressing them.
pub fn list_zip(path: &Path) -> Result<Vec<ZipListing>, RoiError> {
    let mut archive = open_zip(path)?;
    let mut listing = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let member = archive
            .by_index_raw(index)
            .map_err(|source| RoiError::ZipEntry {
                path: path.to_path_buf(),
                index,
                message: source.to_string(),
            })?;
        if member.is_dir() {
            continue;
        }

        listing.push(ZipListing {
            name: member.name().to_string(),
            compressed_size: member.compressed_size(),
            uncompressed_size: member.size(),
        });
    }

    Ok(listing)
}

/// Reads every `.roi` file under `root`, sorted by relative path.
pub fn read_dir_entries(root: &Path) -> Result<Vec<ArchiveEntry>, RoiError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| RoiError::DirectoryWalk {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), ROI_FILE_EXTENSION) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort_by_cached_key(|file| rel_string(root, file));

    files
        .into_iter()
        .map(|file| {
            let bytes = fs::read(&file).map_err(RoiError::Io)?;
            Ok(ArchiveEntry {
                name: rel_string(root, &file),
                bytes,
            })
        })
        .collect()
}

/// Reads entries from a zip archive, a directory, or a single `.roi` file.
pub fn read_entries(path: &Path) -> Result<Vec<ArchiveEntry>, RoiError> {
    if path.is_dir() {
        return read_dir_entries(path);
    }
    if has_extension(path, ZIP_FILE_EXTENSION) {
        return read_zip_entries(path);
    }

    let bytes = fs::read(path).map_err(RoiError::Io)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| RoiError::UnsupportedInput {
            path: path.to_path_buf(),
            message: "path has no file name".to_string(),
        })?;
    Ok(vec![ArchiveEntry { name, bytes }])
}

fn open_zip(path: &Path) -> Result<zip::ZipArchive<BufReader<File>>, RoiError> {
    let file = File::open(path).map_err(RoiError::Io)?;
    zip::ZipArchive::new(BufReader::new(file)).map_err(|source| RoiError::ZipOpen {
        path: path.to_path_buf(),
        source,
    })
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
