//! Site validators.
//!
//! Each validator walks the `public/` tree and returns a
//! [`crate::ConformanceReport`] with one result per check.

pub mod landmark;
pub mod links;
pub mod manifest;
pub mod metadata;

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// An HTML page of the site.
#[derive(Debug, Clone)]
pub struct Page {
    /// Path relative to `public/`, `/`-separated.
    pub path: String,
    /// Page markup.
    pub html: String,
}

fn relative(public: &Path, path: &Path) -> String {
    path.strip_prefix(public)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Every file under `public`, as `/`-separated relative paths.
pub fn site_files(public: &Path) -> BTreeSet<String> {
    WalkDir::new(public)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| relative(public, e.path()))
        .collect()
}

/// Every `.html` page under `public`, in path order.
///
/// # Errors
///
/// Returns an error if a page cannot be read.
pub fn pages(public: &Path) -> Result<Vec<Page>> {
    WalkDir::new(public)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|x| x == "html"))
        .map(|e| {
            let html = std::fs::read_to_string(e.path())
                .with_context(|| format!("reading {}", e.path().display()))?;
            Ok(Page {
                path: relative(public, e.path()),
                html,
            })
        })
        .collect()
}

/// Maps a URL path to the file a static host would serve for it, if the
/// site has one. Directory paths serve their `index.html`.
pub fn served_file(files: &BTreeSet<String>, url_path: &str) -> Option<String> {
    let trimmed = url_path.trim_start_matches('/');
    let candidates = if trimmed.is_empty() || trimmed.ends_with('/') {
        vec![format!("{trimmed}index.html")]
    } else {
        vec![trimmed.to_string(), format!("{trimmed}/index.html")]
    };
    candidates.into_iter().find(|c| files.contains(c))
}
