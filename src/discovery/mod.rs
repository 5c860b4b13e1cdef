//! File discovery for documentation trees.
//!
//! This module finds the markdown files a documentation tree exposes:
//! the flat `.md` files of the API directory and the `structures/`
//! subdirectory next to them. Discovery never reads file contents.
//!
//! # Example
//!
//! ```ignore
//! use mdex::discovery::discover;
//!
//! let result = discover("./electron", "docs/api", false)?;
//! println!("Found {} API files", result.api_files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{MdexError, Result};

/// The subdirectory of the API directory holding structure docs.
pub const STRUCTURES_DIR: &str = "structures";

/// The markdown files of one documentation tree, in parse order.
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    /// Top-level API files (modules, classes, elements).
    pub api_files: Vec<PathBuf>,

    /// Structure files from the `structures/` subdirectory.
    pub structure_files: Vec<PathBuf>,
}

impl DiscoveryResult {
    pub fn is_empty(&self) -> bool {
        self.api_files.is_empty() && self.structure_files.is_empty()
    }

    pub fn total(&self) -> usize {
        self.api_files.len() + self.structure_files.len()
    }
}

/// Discover the markdown files of a documentation tree.
///
/// With `use_readme` the tree's `README.md` is the single API file and
/// no structures are scanned; a missing README is an error. Otherwise
/// the API directory is scanned flat (subdirectories are not API files)
/// and sorted by file name for deterministic output.
pub fn discover(
    base_directory: impl AsRef<Path>,
    api_dir: &str,
    use_readme: bool,
) -> Result<DiscoveryResult> {
    let base_directory = base_directory.as_ref();

    if use_readme {
        let readme = base_directory.join("README.md");
        if !readme.is_file() {
            return Err(MdexError::Io {
                path: readme,
                message: "README.md file not found".to_string(),
            });
        }
        return Ok(DiscoveryResult {
            api_files: vec![readme],
            structure_files: Vec::new(),
        });
    }

    let api_path = base_directory.join(api_dir);
    Ok(DiscoveryResult {
        api_files: markdown_files_in(&api_path),
        structure_files: markdown_files_in(&api_path.join(STRUCTURES_DIR)),
    })
}

/// Flat, sorted scan of one directory for `.md` files.
fn markdown_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}
