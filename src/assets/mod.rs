//! Sprite asset lookup.
//!
//! Asset paths are slash-separated and extension-less
//! (`robots/robot-CYAN1`, `workpieces/BASE_RED-CAP_GREY`). A missing asset
//! is an expected outcome, not an error.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};


/// File extension of sprite images on disk
const SPRITE_EXTENSION: &str = "png";

/// An asset found for a path
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAsset {
    pub path: String,
    /// Backing file, if the asset came from disk
    pub source: Option<PathBuf>,
}

/// Pure lookup from asset path to asset
pub trait AssetResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Option<ResolvedAsset>;
}

/// Join a folder and an asset name into an asset path
pub fn asset_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder, name)
    }
}

/// In-memory set of known sprite assets
#[derive(Clone, Debug, Default)]
pub struct AssetCatalog {
    assets: HashMap<String, Option<PathBuf>>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset path with no backing file
    pub fn insert(&mut self, path: impl Into<String>) {
        self.assets.insert(path.into(), None);
    }

    pub fn insert_file(&mut self, path: impl Into<String>, source: PathBuf) {
        self.assets.insert(path.into(), Some(source));
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Build a catalog from every `*.png` below `root`.
    ///
    /// `root/robots/robot-CYAN1.png` registers as `robots/robot-CYAN1`.
    pub fn scan(root: &Path) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.scan_dir(root, root)?;

        debug!(
            root = %root.display(),
            assets = catalog.len(),
            "Scanned sprite directory"
        );

        Ok(catalog)
    }

    /// Like [`AssetCatalog::scan`], but an unreadable root yields an empty
    /// catalog. Every lookup then misses and surfaces as a `Warn` action.
    pub fn scan_or_empty(root: &Path) -> Self {
        match Self::scan(root) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(
                    root = %root.display(),
                    error = %format!("{:#}", e),
                    "Sprite directory unavailable, starting with no assets"
                );
                Self::new()
            }
        }
    }

    fn scan_dir(&mut self, root: &Path, dir: &Path) -> Result<()> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read sprite directory {}", dir.display()))?;

        for entry in entries {
            let entry = entry.context("Failed to read sprite directory entry")?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", path.display()))?;

            if file_type.is_dir() {
                self.scan_dir(root, &path)?;
                continue;
            }

            let is_sprite = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(SPRITE_EXTENSION))
                .unwrap_or(false);
            if !is_sprite {
                continue;
            }

            if let Some(key) = relative_key(root, &path) {
                self.insert_file(key, path);
            }
        }

        Ok(())
    }
}

/// Extension-less, slash-separated path of `file` relative to `root`
fn relative_key(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?.with_extension("");
    let parts: Option<Vec<&str>> = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect();
    Some(parts?.join("/"))
}

impl AssetResolver for AssetCatalog {
    fn resolve(&self, path: &str) -> Option<ResolvedAsset> {
        self.assets.get(path).map(|source| ResolvedAsset {
            path: path.to_string(),
            source: source.clone(),
        })
    }
}
