//! File categorization by extension.
//!
//! Every file name is classified by the text after its last `.`, compared
//! case-insensitively against one static table. Anything not in the table,
//! including names without an extension, lands in [`Category::Others`].
//!
//! # Examples
//!
//! ```
//! use sortdir::file_category::{Category, categorize};
//!
//! assert_eq!(categorize("photo.JPG"), Category::Images);
//! assert_eq!(categorize("notes.txt"), Category::Documents);
//! assert_eq!(categorize("mystery"), Category::Others);
//! ```

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A destination category. Each one owns a subfolder of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Images,
    Documents,
    Videos,
    Audio,
    Archives,
    Programs,
    Executables,
    /// Unmapped extensions and files without one.
    Others,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 8] = [
        Category::Images,
        Category::Documents,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::Programs,
        Category::Executables,
        Category::Others,
    ];

    /// Returns the subfolder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdir::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Documents => "Documents",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Programs => "Programs",
            Category::Executables => "Executables",
            Category::Others => "Others",
        }
    }

    /// Returns the extensions mapped to this category, with their leading dot.
    ///
    /// `Others` has none: it is the fallback.
    pub fn extensions(&self) -> impl Iterator<Item = &'static str> + '_ {
        CATEGORY_RULES
            .iter()
            .filter(move |(_, category)| category == self)
            .map(|(ext, _)| *ext)
    }

    /// Looks up the category of an extension such as `".jpg"` or `".JPG"`.
    ///
    /// Unknown extensions map to `Others`.
    pub fn from_extension(ext: &str) -> Category {
        EXTENSION_INDEX
            .get(ext.to_lowercase().as_str())
            .copied()
            .unwrap_or(Category::Others)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The extension table. Keys are lower-case and carry the leading dot.
pub const CATEGORY_RULES: &[(&str, Category)] = &[
    (".jpg", Category::Images),
    (".jpeg", Category::Images),
    (".png", Category::Images),
    (".gif", Category::Images),
    (".bmp", Category::Images),
    (".svg", Category::Images),
    (".ico", Category::Images),
    (".webp", Category::Images),
    (".pdf", Category::Documents),
    (".doc", Category::Documents),
    (".docx", Category::Documents),
    (".txt", Category::Documents),
    (".xls", Category::Documents),
    (".xlsx", Category::Documents),
    (".ppt", Category::Documents),
    (".pptx", Category::Documents),
    (".odt", Category::Documents),
    (".csv", Category::Documents),
    (".mp4", Category::Videos),
    (".mkv", Category::Videos),
    (".flv", Category::Videos),
    (".avi", Category::Videos),
    (".mov", Category::Videos),
    (".wmv", Category::Videos),
    (".webm", Category::Videos),
    (".mp3", Category::Audio),
    (".wav", Category::Audio),
    (".aac", Category::Audio),
    (".flac", Category::Audio),
    (".m4a", Category::Audio),
    (".wma", Category::Audio),
    (".zip", Category::Archives),
    (".rar", Category::Archives),
    (".tar", Category::Archives),
    (".gz", Category::Archives),
    (".7z", Category::Archives),
    (".bz2", Category::Archives),
    (".py", Category::Programs),
    (".c", Category::Programs),
    (".cpp", Category::Programs),
    (".java", Category::Programs),
    (".html", Category::Programs),
    (".css", Category::Programs),
    (".js", Category::Programs),
    (".php", Category::Programs),
    (".json", Category::Programs),
    (".xml", Category::Programs),
    (".exe", Category::Executables),
    (".msi", Category::Executables),
    (".apk", Category::Executables),
    (".app", Category::Executables),
    (".bat", Category::Executables),
    (".sh", Category::Executables),
];

static EXTENSION_INDEX: LazyLock<HashMap<&'static str, Category>> =
    LazyLock::new(|| CATEGORY_RULES.iter().copied().collect());

/// Splits a file name into stem and extension at the last `.`.
///
/// The extension keeps its dot. Leading dots belong to the stem, so
/// `.bashrc` has no extension, while `notes.` has the extension `"."`.
///
/// # Examples
///
/// ```
/// use sortdir::file_category::split_extension;
///
/// assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
/// assert_eq!(split_extension("mystery"), ("mystery", ""));
/// ```
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading_dots..].rfind('.') {
        Some(idx) => file_name.split_at(leading_dots + idx),
        None => (file_name, ""),
    }
}

/// Determines the category of a file from its name.
pub fn categorize(file_name: &str) -> Category {
    match split_extension(file_name) {
        (_, "") => Category::Others,
        (_, ext) => Category::from_extension(ext),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_dir_names() {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.dir_name()).collect();
        assert_eq!(
            names,
            [
                "Images",
                "Documents",
                "Videos",
                "Audio",
                "Archives",
                "Programs",
                "Executables",
                "Others"
            ]
        );
    }

    #[test]
    fn test_every_extension_maps_once() {
        let mut seen = HashSet::new();
        for (ext, _) in CATEGORY_RULES {
            assert!(seen.insert(*ext), "duplicate rule for {ext}");
            assert!(ext.starts_with('.'));
            assert_eq!(*ext, ext.to_lowercase());
        }
        assert_eq!(EXTENSION_INDEX.len(), CATEGORY_RULES.len());
    }

    #[test]
    fn test_others_has_no_rules() {
        assert_eq!(Category::Others.extensions().count(), 0);
        assert!(Category::Images.extensions().any(|e| e == ".webp"));
    }

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(Category::from_extension(".JPG"), Category::Images);
        assert_eq!(Category::from_extension(".Mp3"), Category::Audio);
        assert_eq!(Category::from_extension(".xyz"), Category::Others);
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("photo.JPG"), ("photo", ".JPG"));
        assert_eq!(split_extension("notes."), ("notes", "."));
        assert_eq!(split_extension("..hidden.txt"), ("..hidden", ".txt"));
        assert_eq!(split_extension("..."), ("...", ""));
        assert_eq!(split_extension(""), ("", ""));
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("photo.JPG"), Category::Images);
        assert_eq!(categorize("report.final.PDF"), Category::Documents);
        assert_eq!(categorize("clip.webm"), Category::Videos);
        assert_eq!(categorize("song.flac"), Category::Audio);
        assert_eq!(categorize("backup.tar.gz"), Category::Archives);
        assert_eq!(categorize("main.cpp"), Category::Programs);
        assert_eq!(categorize("install.sh"), Category::Executables);
    }

    #[test]
    fn test_categorize_defaults_to_others() {
        assert_eq!(categorize("mystery"), Category::Others);
        assert_eq!(categorize(".bashrc"), Category::Others);
        assert_eq!(categorize("notes."), Category::Others);
        assert_eq!(categorize("lib.rs"), Category::Others);
    }

    #[test]
    fn test_display_matches_dir_name() {
        assert_eq!(Category::Executables.to_string(), "Executables");
    }
}
