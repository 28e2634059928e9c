//! Command-line front end for sortdir.
//!
//! This module turns a parsed command into a run of the [`Organizer`] and
//! renders the outcome. Expected failures never escape as panics: a bad
//! folder or configuration becomes an `Err(String)` for `main` to print,
//! and per-file problems are listed in the run summary.

use crate::config::FilterConfig;
use crate::file_organizer::Organizer;
use crate::output::OutputFormatter;
use crate::report::ScanResult;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Represents a CLI command to execute.
#[derive(Debug, Clone)]
pub enum OrganizeCommand {
    /// Move the files of a folder into category subfolders.
    Organize {
        path: PathBuf,
        /// Print the result as JSON instead of a table.
        json: bool,
        /// Show a progress bar while moving.
        progress: bool,
    },
    /// Show where files would go without moving anything.
    Preview { path: PathBuf, json: bool },
    /// List the supported categories and extensions.
    Categories,
}

/// Runs a command, loading filter configuration from the default locations.
///
/// # Examples
///
/// ```no_run
/// use sortdir::cli::{run_cli, OrganizeCommand};
/// use std::path::PathBuf;
///
/// let command = OrganizeCommand::Preview {
///     path: PathBuf::from("/path/to/directory"),
///     json: false,
/// };
/// if let Err(e) = run_cli(command) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: OrganizeCommand) -> Result<(), String> {
    run_cli_with_config(command, None)
}

/// Runs a command with an optional explicit configuration file.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    config_path: Option<&Path>,
) -> Result<(), String> {
    match command {
        OrganizeCommand::Organize {
            path,
            json,
            progress,
        } => {
            let organizer = load_organizer(config_path)?;
            let result = organize_directory(&organizer, &path, progress && !json)?;
            if json {
                print_json(&result)
            } else {
                OutputFormatter::scan_result(&result);
                Ok(())
            }
        }
        OrganizeCommand::Preview { path, json } => {
            let organizer = load_organizer(config_path)?;
            let preview = organizer.preview(&path).map_err(|e| e.to_string())?;
            if json {
                print_json(&preview)
            } else {
                OutputFormatter::info(&format!("Analyzing folder: {}", path.display()));
                OutputFormatter::preview(&preview);
                Ok(())
            }
        }
        OrganizeCommand::Categories => {
            OutputFormatter::categories();
            Ok(())
        }
    }
}

/// Builds an organizer from the filter configuration.
fn load_organizer(config_path: Option<&Path>) -> Result<Organizer, String> {
    let filters = FilterConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;
    Ok(Organizer::with_filters(filters))
}

/// Organizes `base_path`, optionally drawing a progress bar.
///
/// Returns the run summary even when some files failed; only an unusable
/// folder is an error.
pub fn organize_directory(
    organizer: &Organizer,
    base_path: &Path,
    show_progress: bool,
) -> Result<ScanResult, String> {
    if !show_progress {
        return organizer.organize(base_path).map_err(|e| e.to_string());
    }

    let mut bar = None;
    let result = organizer.organize_with_progress(base_path, |progress| {
        let pb = bar
            .get_or_insert_with(|| OutputFormatter::create_progress_bar(progress.total as u64));
        pb.set_position(progress.current as u64);
        pb.set_message(progress.file_name.to_string());
    });
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    result.map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Error serializing result: {}", e))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_organize_directory_with_progress() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mp3"), "").unwrap();
        fs::write(temp_dir.path().join("b.mov"), "").unwrap();

        let result = organize_directory(&Organizer::new(), temp_dir.path(), true).unwrap();

        assert_eq!(result.moved_files(), 2);
        assert!(temp_dir.path().join("Audio/a.mp3").exists());
        assert!(temp_dir.path().join("Videos/b.mov").exists());
    }

    #[test]
    fn test_invalid_path_becomes_message() {
        let err = organize_directory(&Organizer::new(), Path::new("/non/existent/path"), false)
            .unwrap_err();
        assert!(err.contains("folder not found"), "unexpected message: {err}");
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let command = OrganizeCommand::Organize {
            path: temp_dir.path().to_path_buf(),
            json: false,
            progress: false,
        };

        let err = run_cli_with_config(command, Some(Path::new("/no/such/config.toml")))
            .unwrap_err();
        assert!(err.starts_with("Error loading configuration"));
    }

    #[test]
    fn test_categories_command() {
        assert!(run_cli(OrganizeCommand::Categories).is_ok());
    }
}
