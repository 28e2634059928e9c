//! sortdir - sort the files of one folder into category subfolders
//!
//! This library classifies files by extension into a fixed set of categories
//! (Images, Documents, Videos, Audio, Archives, Programs, Executables,
//! Others) and moves the direct children of a folder into matching
//! subfolders. An optional TOML configuration can leave some files in place.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod report;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use file_category::{Category, categorize};
pub use file_organizer::{
    FileMoveError, InvalidPathReason, OrganizeError, OrganizeResult, Organizer, organize,
};
pub use report::{FileFailure, MoveRecord, Preview, Progress, ScanResult};

pub use cli::{OrganizeCommand, run_cli};
