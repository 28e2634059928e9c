//! Moving files into category subfolders.
//!
//! An [`Organizer`] looks at the direct children of one root folder. Every
//! regular file is classified by extension and renamed into `root/<Category>/`.
//! Subfolders, symbolic links and special files are never touched, so a
//! second run over the same folder moves nothing.

use crate::config::CompiledFilters;
use crate::config::LOCAL_CONFIG_FILE;
use crate::file_category::{Category, categorize};
use crate::report::{MoveRecord, Preview, Progress, ScanResult};
use chrono::Utc;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a root folder was rejected.
#[derive(Debug, Error)]
pub enum InvalidPathReason {
    #[error("no folder given")]
    Empty,
    #[error("folder not found")]
    NotFound,
    #[error("not a folder")]
    NotADirectory,
    #[error("folder is read-only")]
    ReadOnly,
    #[error("folder cannot be read: {0}")]
    Unreadable(#[source] io::Error),
}

/// Fatal errors. These abort a run before anything on disk changes.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Invalid folder {}: {reason}", .path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        reason: InvalidPathReason,
    },
}

/// Per-file errors. These are recorded in the [`ScanResult`] and the run
/// continues with the next file.
#[derive(Debug, Error)]
pub enum FileMoveError {
    #[error("could not create folder {}: {source}", .path.display())]
    CategoryDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not move to {}: {source}", .destination.display())]
    Rename {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no free name for {file_name} in {}", .dir.display())]
    NoFreeName { file_name: String, dir: PathBuf },
    #[error("could not read folder entry: {0}")]
    Entry(#[source] io::Error),
}

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A regular file found in the root folder.
struct Candidate {
    file_name: String,
    path: PathBuf,
}

/// The root folder's listing, split into what can be processed and what
/// could not even be read.
struct Listing {
    candidates: Vec<Candidate>,
    unreadable: Vec<io::Error>,
}

/// Sorts the files of a root folder into category subfolders.
#[derive(Debug, Default)]
pub struct Organizer {
    filters: Option<CompiledFilters>,
}

impl Organizer {
    /// Creates an organizer that moves every regular file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an organizer that only moves files accepted by `filters`.
    pub fn with_filters(filters: CompiledFilters) -> Self {
        Self {
            filters: Some(filters),
        }
    }

    /// Moves every eligible file in `root` into its category subfolder.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::InvalidPath`] if `root` is not an existing,
    /// readable, writable directory. Nothing is changed in that case.
    /// Failures on individual files are reported in the returned
    /// [`ScanResult`] instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::Organizer;
    /// use std::path::Path;
    ///
    /// let result = Organizer::new().organize(Path::new("/home/me/Downloads"))?;
    /// println!("moved {} files", result.moved_files());
    /// # Ok::<(), sortdir::OrganizeError>(())
    /// ```
    pub fn organize(&self, root: &Path) -> OrganizeResult<ScanResult> {
        self.organize_with_progress(root, |_| {})
    }

    /// Like [`organize`](Self::organize), calling `on_progress` before each file.
    pub fn organize_with_progress<F>(
        &self,
        root: &Path,
        mut on_progress: F,
    ) -> OrganizeResult<ScanResult>
    where
        F: FnMut(&Progress<'_>),
    {
        let listing = list_files(root)?;
        let mut result = ScanResult::new(root.to_path_buf());
        result.total_files = listing.candidates.len();

        for source in listing.unreadable {
            let error = FileMoveError::Entry(source);
            warn!(root = %root.display(), "{error}");
            result.record_failure("<unreadable entry>", error);
        }

        let total = listing.candidates.len();
        for (idx, candidate) in listing.candidates.iter().enumerate() {
            on_progress(&Progress {
                current: idx + 1,
                total,
                file_name: &candidate.file_name,
            });

            if !self.accepts(&candidate.file_name) {
                debug!(file = %candidate.file_name, "excluded by filters");
                result.excluded.push(candidate.file_name.clone());
                continue;
            }

            let category = categorize(&candidate.file_name);
            match move_to_category(root, candidate, category) {
                Ok(record) => {
                    debug!(
                        file = %candidate.file_name,
                        destination = %record.destination.display(),
                        renamed = record.renamed,
                        "moved"
                    );
                    result.record_move(record);
                }
                Err(error) => {
                    warn!(file = %candidate.file_name, "{error}");
                    result.record_failure(candidate.file_name.clone(), error);
                }
            }
        }

        result.finished_at = Utc::now();
        info!(
            root = %root.display(),
            moved = result.moved_files(),
            failed = result.failures.len(),
            excluded = result.excluded.len(),
            "organization finished"
        );
        Ok(result)
    }

    /// Reports where each eligible file in `root` would go, changing nothing.
    ///
    /// # Errors
    ///
    /// Same validation as [`organize`](Self::organize).
    pub fn preview(&self, root: &Path) -> OrganizeResult<Preview> {
        list_files(root).map(|listing| self.preview_listing(listing))
    }

    fn preview_listing(&self, listing: Listing) -> Preview {
        let mut preview = Preview {
            unreadable: listing.unreadable.len(),
            ..Preview::default()
        };

        for candidate in listing.candidates {
            if !self.accepts(&candidate.file_name) {
                preview.excluded.push(candidate.file_name);
                continue;
            }
            preview
                .categories
                .entry(categorize(&candidate.file_name))
                .or_default()
                .push(candidate.file_name);
        }

        preview
    }

    /// The local configuration file always stays where it is, so a folder
    /// keeps its filters across runs.
    fn accepts(&self, file_name: &str) -> bool {
        file_name != LOCAL_CONFIG_FILE
            && self
                .filters
                .as_ref()
                .is_none_or(|filters| filters.should_include(file_name))
    }
}

/// Organizes `root` with the default organizer.
pub fn organize(root: &Path) -> OrganizeResult<ScanResult> {
    Organizer::new().organize(root)
}

/// Checks that `root` can be organized and lists its regular files, sorted
/// by name.
fn list_files(root: &Path) -> OrganizeResult<Listing> {
    let invalid = |reason| OrganizeError::InvalidPath {
        path: root.to_path_buf(),
        reason,
    };

    if root.as_os_str().is_empty() {
        return Err(invalid(InvalidPathReason::Empty));
    }

    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(invalid(InvalidPathReason::NotFound));
        }
        Err(e) => return Err(invalid(InvalidPathReason::Unreadable(e))),
    };
    if !metadata.is_dir() {
        return Err(invalid(InvalidPathReason::NotADirectory));
    }
    if metadata.permissions().readonly() || !is_writable(root) {
        return Err(invalid(InvalidPathReason::ReadOnly));
    }

    let entries = fs::read_dir(root).map_err(|e| invalid(InvalidPathReason::Unreadable(e)))?;

    let mut listing = Listing {
        candidates: Vec::new(),
        unreadable: Vec::new(),
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                listing.unreadable.push(e);
                continue;
            }
        };
        // file_type() does not follow symlinks, so links are skipped here.
        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => listing.candidates.push(Candidate {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                path: entry.path(),
            }),
            Ok(_) => {}
            Err(e) => listing.unreadable.push(e),
        }
    }

    listing
        .candidates
        .sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(listing)
}

/// Moves one file into `root/<category>/`, creating the folder if needed.
fn move_to_category(
    root: &Path,
    candidate: &Candidate,
    category: Category,
) -> Result<MoveRecord, FileMoveError> {
    let category_path = root.join(category.dir_name());

    if !category_path.is_dir() {
        fs::create_dir(&category_path).map_err(|source| FileMoveError::CategoryDir {
            path: category_path.clone(),
            source,
        })?;
    }

    let (destination, renamed) = free_destination(&category_path, candidate)?;

    fs::rename(&candidate.path, &destination).map_err(|source| FileMoveError::Rename {
        destination: destination.clone(),
        source,
    })?;

    Ok(MoveRecord {
        file_name: candidate.file_name.clone(),
        destination,
        category,
        renamed,
    })
}

/// Picks the destination path inside `dir`.
///
/// The original name is used when free. Otherwise `stem_1.ext`, `stem_2.ext`
/// and so on are tried in order.
fn free_destination(dir: &Path, candidate: &Candidate) -> Result<(PathBuf, bool), FileMoveError> {
    let Some(original_name) = candidate.path.file_name() else {
        return Err(FileMoveError::NoFreeName {
            file_name: candidate.file_name.clone(),
            dir: dir.to_path_buf(),
        });
    };
    let destination = dir.join(original_name);
    if !is_taken(&destination) {
        return Ok((destination, false));
    }

    for counter in 1..=u32::MAX {
        let destination = dir.join(suffixed_name(original_name, counter));
        if !is_taken(&destination) {
            return Ok((destination, true));
        }
    }

    Err(FileMoveError::NoFreeName {
        file_name: candidate.file_name.clone(),
        dir: dir.to_path_buf(),
    })
}

/// Inserts `_counter` before the extension of `name`, working on the raw
/// name so non-UTF-8 bytes survive.
#[cfg(unix)]
fn suffixed_name(name: &OsStr, counter: u32) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let bytes = name.as_bytes();
    let leading_dots = bytes.iter().take_while(|&&b| b == b'.').count();
    let split = bytes[leading_dots..]
        .iter()
        .rposition(|&b| b == b'.')
        .map_or(bytes.len(), |idx| leading_dots + idx);
    let (stem, ext) = bytes.split_at(split);

    let mut suffixed = stem.to_vec();
    suffixed.extend_from_slice(format!("_{counter}").as_bytes());
    suffixed.extend_from_slice(ext);
    OsString::from_vec(suffixed)
}

#[cfg(not(unix))]
fn suffixed_name(name: &OsStr, counter: u32) -> OsString {
    let name = name.to_string_lossy();
    let (stem, ext) = crate::file_category::split_extension(&name);
    OsString::from(format!("{stem}_{counter}{ext}"))
}

/// Whether the current user may create entries in `dir`.
#[cfg(unix)]
fn is_writable(dir: &Path) -> bool {
    use rustix::fs::{Access, access};

    access(dir, Access::WRITE_OK | Access::EXEC_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(_dir: &Path) -> bool {
    true
}

/// A name is taken by any directory entry, including a dangling symlink.
fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
