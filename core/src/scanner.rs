//! Recursive directory walk that feeds the engine.

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "cpp", "hpp", "c", "h",
    "java", "py", "js", "ts", "rs", "go", "rb", "php",
    "json", "xml", "yaml", "yml", "toml", "ini", "cfg",
];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lowercase file extensions without the leading dot.
    pub extensions: HashSet<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect() }
    }
}

impl ScanOptions {
    /// Allowlist from user input; `".MD"` and `"md"` are the same entry.
    /// An empty list falls back to the defaults.
    pub fn with_extensions<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: HashSet<String> = exts
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() { Self::default() } else { Self { extensions } }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_indexed: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct Scanner {
    options: ScanOptions,
    last_stats: ScanStats,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options, last_stats: ScanStats::default() }
    }

    /// Read every eligible, non-empty file under `root`, ordered by path.
    ///
    /// Entries that can't be walked or read are logged and skipped.
    pub fn scan<P: AsRef<Path>>(&mut self, root: P) -> Result<Vec<ScannedFile>> {
        let root = root.as_ref();
        self.last_stats = ScanStats::default();
        if !root.is_dir() {
            bail!("not a directory: {}", root.display());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            self.last_stats.files_scanned += 1;

            let path = entry.path();
            if !should_index(path, &self.options.extensions) {
                continue;
            }
            let bytes = match fs::read(path) {
                Ok(b) => b,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            };
            if bytes.is_empty() {
                continue;
            }
            self.last_stats.files_indexed += 1;
            self.last_stats.total_bytes += bytes.len() as u64;
            let content = String::from_utf8_lossy(&bytes).into_owned();
            files.push(ScannedFile { path: path.to_path_buf(), content });
        }

        tracing::info!(
            root = %root.display(),
            files_scanned = self.last_stats.files_scanned,
            files_indexed = self.last_stats.files_indexed,
            "scan complete"
        );
        Ok(files)
    }

    pub fn last_stats(&self) -> ScanStats { self.last_stats }
}

pub fn should_index(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| extensions.contains(&ext.to_ascii_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_matching_ignores_case() {
        let opts = ScanOptions::default();
        assert!(should_index(Path::new("notes/README.MD"), &opts.extensions));
        assert!(should_index(Path::new("src/main.rs"), &opts.extensions));
        assert!(!should_index(Path::new("image.png"), &opts.extensions));
        assert!(!should_index(Path::new("Makefile"), &opts.extensions));
    }

    #[test]
    fn custom_extensions_are_normalized() {
        let opts = ScanOptions::with_extensions([".LOG", " csv "]);
        assert!(should_index(Path::new("a.log"), &opts.extensions));
        assert!(should_index(Path::new("b.CSV"), &opts.extensions));
        assert!(!should_index(Path::new("c.txt"), &opts.extensions));
        assert_eq!(ScanOptions::with_extensions(Vec::<String>::new()).extensions.len(), DEFAULT_EXTENSIONS.len());
    }

    #[test]
    fn missing_root_is_an_error() {
        let mut scanner = Scanner::default();
        assert!(scanner.scan("/definitely/not/here").is_err());
    }
}
