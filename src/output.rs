//! Output formatting and styling module.
//!
//! Everything the CLI prints to the terminal goes through [`OutputFormatter`],
//! so wording and colors stay consistent across commands.

use crate::file_category::Category;
use crate::report::{Preview, ScanResult};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for runs
/// - Summary tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for `total` files.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a table of moved files per category.
    pub fn summary_table(category_counts: &BTreeMap<Category, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = category_counts
            .keys()
            .map(|category| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = width
        );
    }

    /// Prints the outcome of an organization run.
    pub fn scan_result(result: &ScanResult) {
        if result.total_files == 0 && result.failures.is_empty() {
            Self::warning("No files found in this folder.");
            return;
        }

        for record in result.moves.iter().filter(|record| record.renamed) {
            Self::info(&format!(
                "{} already existed in {}/, saved as {}",
                record.file_name,
                record.category,
                record
                    .destination
                    .file_name()
                    .map(|name| name.to_string_lossy())
                    .unwrap_or_default()
            ));
        }

        Self::summary_table(&result.category_counts, result.moved_files());

        println!();
        println!("Files found:   {}", result.total_files);
        println!("Files moved:   {}", result.moved_files());
        println!("Files skipped: {}", result.skipped_files());

        if !result.excluded.is_empty() {
            Self::header("Left in place by filters");
            for name in &result.excluded {
                println!("  • {}", name);
            }
        }

        if result.is_clean() {
            println!();
            Self::success("File organization completed successfully!");
        } else {
            Self::header("Errors encountered");
            for failure in &result.failures {
                Self::error(&format!("Error moving {}: {}", failure.file_name, failure.error));
            }
            println!();
            Self::warning(&format!(
                "{} {} could not be moved and {} left in place.",
                result.failures.len(),
                plural(result.failures.len()),
                if result.failures.len() == 1 { "was" } else { "were" }
            ));
        }
    }

    /// Prints where each file would go.
    pub fn preview(preview: &Preview) {
        if preview.is_empty() && preview.unreadable == 0 {
            Self::warning("No files found in this folder.");
            return;
        }

        Self::success(&format!("Found {} files", preview.total_files()));
        Self::header("Preview of file organization:");
        for (category, files) in &preview.categories {
            println!("📁 {} ({} {})", category, files.len(), plural(files.len()));
            for file in files {
                println!("  • {}", file);
            }
        }

        if !preview.excluded.is_empty() {
            Self::header("Left in place by filters");
            for name in &preview.excluded {
                println!("  • {}", name);
            }
        }

        if preview.unreadable > 0 {
            println!();
            Self::warning(&format!(
                "{} folder {} could not be read.",
                preview.unreadable,
                if preview.unreadable == 1 { "entry" } else { "entries" }
            ));
        }

        println!();
        println!("{}", "[PREVIEW] No files were modified.".yellow());
    }

    /// Prints every category with its extensions.
    pub fn categories() {
        Self::header("Supported file categories");
        for category in Category::ALL {
            let extensions: Vec<_> = category.extensions().collect();
            if extensions.is_empty() {
                println!("📁 {:<12} (anything else)", category.dir_name());
            } else {
                println!("📁 {:<12} {}", category.dir_name(), extensions.join(", "));
            }
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
