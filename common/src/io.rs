use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const QUALIFIER: &str = "dev";
pub const ORGANIZATION: &str = "xairaven";
pub const APPLICATION: &str = "framescope";

pub enum FileKind {
    Captures,
    Logs,
}

impl FileKind {
    /// Sub-directory of the platform data directory.
    pub fn into_path(self, project_dirs: &ProjectDirs) -> PathBuf {
        match self {
            FileKind::Captures => project_dirs.data_dir().join("captures"),
            FileKind::Logs => project_dirs.data_dir().join("logs"),
        }
    }
}

/// Platform directory for `file_kind`, or the working directory when
/// the platform has none (no home directory).
pub fn storage_directory(file_kind: FileKind) -> Result<PathBuf, std::io::Error> {
    match ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION) {
        Some(dirs) => Ok(file_kind.into_path(&dirs)),
        None => env::current_dir(),
    }
}

pub fn get_storage_file_path(
    file_name: &str, file_kind: FileKind,
) -> Result<PathBuf, std::io::Error> {
    Ok(storage_directory(file_kind)?.join(file_name))
}

pub fn create_parent_directories(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent_path) = path.parent() {
        return fs::create_dir_all(parent_path);
    }

    Ok(())
}
