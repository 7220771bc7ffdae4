//! Input file collection.
//!
//! Walks an input directory with `walkdir`, pruning excluded directories and
//! paths and keeping files whose extension is in the allow-list. Results are
//! returned in a stable, name-sorted order.

use crate::error::Result;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extensions used when none are configured.
pub const DEFAULT_EXTENSIONS: &str = ".txt,.md,.csv";

/// Which files to collect under an input root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectFilter {
    /// Lowercased, dot-prefixed extensions. Empty accepts every file.
    pub extensions: BTreeSet<String>,
    /// Directory base names skipped wherever they appear.
    pub exclude_dirs: BTreeSet<String>,
    /// Paths relative to the input root; directories are pruned, files skipped.
    pub exclude_paths: BTreeSet<PathBuf>,
}

impl CollectFilter {
    /// Build a filter from raw CLI values.
    pub fn new<D, P>(extensions: &str, exclude_dirs: D, exclude_paths: P) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            extensions: parse_extensions(extensions),
            exclude_dirs: build_exclude_dirs(exclude_dirs),
            exclude_paths: build_exclude_paths(exclude_paths),
        }
    }

    /// Whether a file name passes the extension allow-list.
    pub fn accepts_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        self.extensions.contains(&ext)
    }
}

/// Parse a comma-separated extension list: `"txt, .MD"` -> `{".txt", ".md"}`.
pub fn parse_extensions(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|part| part.trim().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| {
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            }
        })
        .collect()
}

/// Reduce each exclude-dir value to its base name.
pub fn build_exclude_dirs<I>(values: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .filter_map(|raw| {
            let trimmed = raw.as_ref().trim();
            if trimmed.is_empty() {
                return None;
            }
            Path::new(trimmed)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .collect()
}

/// Normalize exclude-path values into clean relative paths.
pub fn build_exclude_paths<I>(values: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    values
        .into_iter()
        .filter_map(|raw| {
            let trimmed = raw.as_ref().trim();
            if trimmed.is_empty() {
                return None;
            }
            let cleaned = clean_relative(Path::new(trimmed));
            if cleaned.as_os_str().is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .collect()
}

/// Lexically clean a path and drop any root, so `/a/./b/../c` becomes `a/c`.
fn clean_relative(path: &Path) -> PathBuf {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.iter().collect()
}

/// Collect every matching file under `root`.
///
/// A file given as `root` is returned as-is, without applying the filter.
pub fn collect_files(root: &Path, filter: &CollectFilter) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(root, entry, filter));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if filter.accepts_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_excluded(root: &Path, entry: &walkdir::DirEntry, filter: &CollectFilter) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if let Ok(rel) = entry.path().strip_prefix(root) {
        if filter.exclude_paths.contains(&clean_relative(rel)) {
            return true;
        }
    }
    entry.file_type().is_dir()
        && filter
            .exclude_dirs
            .contains(entry.file_name().to_string_lossy().as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn rels(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_parse_extensions() {
        let exts = parse_extensions("txt, .MD ,,csv");
        assert_eq!(
            exts.into_iter().collect::<Vec<_>>(),
            vec![".csv", ".md", ".txt"]
        );
        assert!(parse_extensions(" , ").is_empty());
    }

    #[test]
    fn test_exclude_values_normalized() {
        let dirs = build_exclude_dirs(["drafts/", " nested/archive ", ""]);
        assert!(dirs.contains("drafts"));
        assert!(dirs.contains("archive"));
        assert_eq!(dirs.len(), 2);

        let paths = build_exclude_paths(["/private/notes.txt", "./a/../b", ".", "  "]);
        assert!(paths.contains(Path::new("private/notes.txt")));
        assert!(paths.contains(Path::new("b")));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_collect_sorted_with_extension_filter() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.txt");
        touch(dir.path(), "a.md");
        touch(dir.path(), "image.png");
        touch(dir.path(), "sub/c.TXT");

        let filter = CollectFilter::new(DEFAULT_EXTENSIONS, Vec::<String>::new(), Vec::<String>::new());
        let files = collect_files(dir.path(), &filter).unwrap();
        assert_eq!(rels(dir.path(), &files), vec!["a.md", "b.txt", "sub/c.TXT"]);
    }

    #[test]
    fn test_empty_extension_set_accepts_all() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.bin");
        touch(dir.path(), "noext");

        let filter = CollectFilter::new("", Vec::<String>::new(), Vec::<String>::new());
        let files = collect_files(dir.path(), &filter).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_exclude_dir_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "keep.txt");
        touch(dir.path(), "drafts/skip.txt");
        touch(dir.path(), "year/drafts/skip.txt");
        touch(dir.path(), "year/final.txt");

        let filter = CollectFilter::new(DEFAULT_EXTENSIONS, ["drafts"], Vec::<String>::new());
        let files = collect_files(dir.path(), &filter).unwrap();
        assert_eq!(rels(dir.path(), &files), vec!["keep.txt", "year/final.txt"]);
    }

    #[test]
    fn test_exclude_path_prunes_dirs_and_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/secret.txt");
        touch(dir.path(), "a/public.txt");
        touch(dir.path(), "b/inner/x.txt");
        touch(dir.path(), "b/y.txt");

        let filter = CollectFilter::new(
            DEFAULT_EXTENSIONS,
            Vec::<String>::new(),
            ["a/secret.txt", "/b/inner"],
        );
        let files = collect_files(dir.path(), &filter).unwrap();
        assert_eq!(rels(dir.path(), &files), vec!["a/public.txt", "b/y.txt"]);
    }

    #[test]
    fn test_single_file_returned_as_is() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "essay.rtf");
        let path = dir.path().join("essay.rtf");

        let filter = CollectFilter::new(DEFAULT_EXTENSIONS, Vec::<String>::new(), Vec::<String>::new());
        assert_eq!(collect_files(&path, &filter).unwrap(), vec![path]);
    }
}
