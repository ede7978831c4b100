//! Path utilities for safe cross-platform file handling

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SpeechClipError};

/// Characters stripped from generated filenames
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Names reserved by Windows that must not be used as file stems
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Replace characters that are not safe in filenames with underscores
pub fn safe_filename(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| {
            if INVALID_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let stem_upper = cleaned
        .split('.')
        .next()
        .unwrap_or_default()
        .to_uppercase();
    if RESERVED_NAMES.contains(&stem_upper.as_str()) {
        cleaned.insert(0, '_');
    }

    if cleaned.is_empty() {
        cleaned.push('_');
    }

    cleaned
}

/// Create a directory (including parents) if it does not exist
pub fn ensure_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| SpeechClipError::FileOperation {
        path: path.display().to_string(),
        message: format!("failed to create directory: {}", e),
    })
}

/// Convert a path to Windows long-path form when it exceeds the classic limit
pub fn to_long_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    if cfg!(windows) && raw.len() > 260 && !raw.starts_with("\\\\?\\") {
        PathBuf::from(format!("\\\\?\\{}", raw))
    } else {
        path.to_path_buf()
    }
}

/// Validate an input path exists and is a regular file
pub fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(SpeechClipError::InputFileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

/// Recursively collect media files under a directory, matching the given
/// lowercase extensions. Results are sorted for stable ordering.
pub fn find_media_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SpeechClipError::FileOperation {
            path: dir.display().to_string(),
            message: "not a directory".to_string(),
        });
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| extensions.contains(&e.to_lowercase()))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    Ok(files)
}
