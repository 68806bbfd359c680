use anyhow::Result;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory, skipping everything under `exclude`
    ///
    /// Results are sorted by path so runs are reproducible. Directory symlinks
    /// are not descended into, and unreadable entries are skipped with a warning.
    pub fn find_files_excluding<P1: AsRef<Path>, P2: AsRef<Path>>(
        dir: P1,
        extension: &str,
        exclude: P2,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let extension = extension.trim_start_matches('.');
        let exclude = Self::comparable_path(exclude.as_ref());

        let mut result = Vec::new();
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && Self::comparable_path(entry.path()) == exclude)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();

            // Symlinked files count, symlinked directories don't
            if !path.is_file() {
                continue;
            }

            let matches_extension = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension));
            if matches_extension && !Self::comparable_path(path).starts_with(&exclude) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    // Canonical form when the path exists, the path itself otherwise
    fn comparable_path(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    /// Move a file, replacing any existing destination
    ///
    /// Falls back to copy and delete when a rename is not possible,
    /// e.g. across filesystems.
    pub fn move_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> io::Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        if to.is_file() {
            fs::remove_file(to)?;
        }

        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                debug!("Rename {:?} -> {:?} failed ({}), copying instead", from, to, rename_err);
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
        }
    }

    /// Remove a file, treating a missing file as success
    ///
    /// Returns whether a file was actually removed.
    pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> io::Result<bool> {
        match fs::remove_file(path.as_ref()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Absolute form of a path for display, leaving it untouched if it can't be resolved
    pub fn display_path<P: AsRef<Path>>(path: P) -> PathBuf {
        Self::comparable_path(path.as_ref())
    }
}
