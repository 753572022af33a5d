use crate::compression;
use crate::io::{self, FileKind};
use chrono::{DateTime, Utc};
use dpi::annotations::ANNOTATION_SCHEMA_VERSION;
use dpi::frame::{Frame, FrameHeader};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const EXTENSION: &str = "fscap";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub file_name: String,
    pub interface: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub frame_count: usize,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureFile {
    pub schema_version: u32,
    pub metadata: CaptureMetadata,
    pub frames: Vec<Frame>,
}

/// Saved captures, one compressed file each, in a single directory.
pub struct StorageManager {
    directory: PathBuf,
}

impl StorageManager {
    pub fn new(directory: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&directory).map_err(StorageError::DirectoryCreation)?;

        Ok(Self { directory })
    }

    /// `captures/` under the platform data directory.
    pub fn from_project_dirs() -> Result<Self, StorageError> {
        let directory =
            io::storage_directory(FileKind::Captures).map_err(StorageError::DirectoryCreation)?;

        Self::new(directory)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `frames` and returns the final metadata.
    ///
    /// Missing file name, start and end time and frame count are taken from
    /// the frames themselves.
    pub fn save(
        &self, frames: &[Frame], mut metadata: CaptureMetadata,
    ) -> Result<CaptureMetadata, StorageError> {
        let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
            return Err(StorageError::NoFrames);
        };

        if metadata.file_name.trim().is_empty() {
            metadata.file_name = default_file_name(Utc::now());
        }
        metadata.file_name = with_extension(metadata.file_name.trim());

        if metadata.start_time.is_none() {
            metadata.start_time = timestamp(first.header());
        }
        if metadata.end_time.is_none() {
            metadata.end_time = timestamp(last.header());
        }
        if metadata.frame_count == 0 {
            metadata.frame_count = frames.len();
        }

        let file = CaptureFile {
            schema_version: ANNOTATION_SCHEMA_VERSION,
            metadata: metadata.clone(),
            frames: frames.to_vec(),
        };

        let json = serde_json::to_vec(&file).map_err(StorageError::Serialization)?;
        let compressed = compression::compress(&json).map_err(StorageError::Compression)?;

        let path = self.path(&metadata.file_name)?;
        fs::write(&path, compressed).map_err(StorageError::Write)?;
        log::debug!(
            "Saved {} frames to {}.",
            metadata.frame_count,
            path.display()
        );

        Ok(metadata)
    }

    pub fn load(&self, file_name: &str) -> Result<CaptureFile, StorageError> {
        let path = self.existing_path(file_name)?;

        let compressed = fs::read(&path).map_err(StorageError::Read)?;
        let json = compression::decompress(&compressed).map_err(StorageError::Compression)?;
        let file: CaptureFile =
            serde_json::from_slice(&json).map_err(StorageError::Serialization)?;

        if file.schema_version != ANNOTATION_SCHEMA_VERSION {
            return Err(StorageError::SchemaVersion(file.schema_version));
        }

        Ok(file)
    }

    /// Metadata of every readable capture, sorted by file name.
    /// Unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<CaptureMetadata>, StorageError> {
        let entries = fs::read_dir(&self.directory).map_err(StorageError::Read)?;

        let mut captures = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_capture = path.is_file()
                && path.extension().is_some_and(|extension| extension == EXTENSION);
            if !is_capture {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            match self.load(&file_name) {
                Ok(file) => captures.push(file.metadata),
                Err(err) => log::warn!("Skipping {file_name}: {err}"),
            }
        }
        captures.sort_by(|left, right| left.file_name.cmp(&right.file_name));

        Ok(captures)
    }

    pub fn delete(&self, file_name: &str) -> Result<(), StorageError> {
        let path = self.existing_path(file_name)?;
        fs::remove_file(&path).map_err(StorageError::Write)?;
        log::debug!("Deleted {}.", path.display());

        Ok(())
    }

    fn path(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        // Plain names only, files never leave the directory.
        let is_plain = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !is_plain {
            return Err(StorageError::InvalidFileName(file_name.to_string()));
        }

        Ok(self.directory.join(file_name))
    }

    fn existing_path(&self, file_name: &str) -> Result<PathBuf, StorageError> {
        let path = self.path(file_name)?;
        if !path.is_file() {
            return Err(StorageError::NotFound(file_name.to_string()));
        }

        Ok(path)
    }
}

/// `capture_YYYYMMDD_HHMMSS.fscap`
pub fn default_file_name(time: DateTime<Utc>) -> String {
    format!("capture_{}.{EXTENSION}", time.format("%Y%m%d_%H%M%S"))
}

fn with_extension(file_name: &str) -> String {
    let has_extension = Path::new(file_name)
        .extension()
        .is_some_and(|extension| extension == EXTENSION);

    match has_extension {
        true => file_name.to_string(),
        false => format!("{file_name}.{EXTENSION}"),
    }
}

pub fn timestamp(header: &FrameHeader) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(header.tv_usec).ok()?.checked_mul(1_000)?;

    DateTime::from_timestamp(header.tv_sec, nanos)
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No frames to save.")]
    NoFrames,

    #[error("Capture file not found.")]
    NotFound(String),

    #[error("Invalid capture file name.")]
    InvalidFileName(String),

    #[error("Unsupported capture schema version.")]
    SchemaVersion(u32),

    #[error("Failed to create the capture directory.")]
    DirectoryCreation(std::io::Error),

    #[error("Failed to read a capture file.")]
    Read(std::io::Error),

    #[error("Failed to write a capture file.")]
    Write(std::io::Error),

    #[error("Compression error.")]
    Compression(std::io::Error),

    #[error("Serialization error.")]
    Serialization(serde_json::Error),
}

impl StorageError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            StorageError::NoFrames => None,
            StorageError::NotFound(name) | StorageError::InvalidFileName(name) => {
                Some(name.clone())
            },
            StorageError::SchemaVersion(version) => Some(version.to_string()),
            StorageError::DirectoryCreation(err)
            | StorageError::Read(err)
            | StorageError::Write(err)
            | StorageError::Compression(err) => Some(err.to_string()),
            StorageError::Serialization(err) => Some(err.to_string()),
        }
    }
}
