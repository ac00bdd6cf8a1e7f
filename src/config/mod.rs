pub mod runtime;
pub use runtime::EnvOverrides;

use crate::entity::Family;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Complete floorwatch configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FloorwatchConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub machines: FamilyConfig,
    #[serde(default)]
    pub robots: FamilyConfig,
    #[serde(default)]
    pub zones: FamilyConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

impl FloorwatchConfig {
    pub fn family(&self, family: Family) -> &FamilyConfig {
        match family {
            Family::Machine => &self.machines,
            Family::Robot => &self.robots,
            Family::Zone => &self.zones,
        }
    }

    /// Snapshot URL for a family: the explicit `url`, else `base_url/<family>`
    pub fn endpoint(&self, family: Family) -> String {
        match &self.family(family).url {
            Some(url) => url.clone(),
            None => format!(
                "{}/{}",
                self.backend.base_url.trim_end_matches('/'),
                family.collection()
            ),
        }
    }

    pub fn families_mut(&mut self) -> [&mut FamilyConfig; 3] {
        [&mut self.machines, &mut self.robots, &mut self.zones]
    }
}

/// Simulation backend
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Sprite directory layout
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// Directory scanned for `*.png` sprites
    #[serde(default = "default_asset_root")]
    pub root: String,
    /// Folder of product sprites, relative to `root`
    #[serde(default = "default_products_folder")]
    pub products_folder: String,
}

fn default_asset_root() -> String {
    "assets/sprites".to_string()
}

fn default_products_folder() -> String {
    "workpieces".to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
            products_folder: default_products_folder(),
        }
    }
}

/// Polling settings for one entity family
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyConfig {
    /// Full snapshot URL; defaults to `base_url/<family>`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Sprite folder relative to the asset root; defaults to the family name
    #[serde(default)]
    pub sprite_folder: Option<String>,
    /// No timeout when unset
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            url: None,
            poll_interval_ms: default_poll_interval_ms(),
            sprite_folder: None,
            request_timeout_ms: None,
        }
    }
}

impl FamilyConfig {
    pub fn sprite_folder(&self, family: Family) -> String {
        self.sprite_folder
            .clone()
            .unwrap_or_else(|| family.collection().to_string())
    }
}

/// View framing
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    /// Width over height
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f32,
    /// Horizontal padding in world units
    #[serde(default = "default_padding")]
    pub padding: f32,
}

fn default_aspect_ratio() -> f32 {
    16.0 / 9.0
}

fn default_padding() -> f32 {
    0.5
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
            padding: default_padding(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &Path) -> Result<FloorwatchConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: FloorwatchConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load configuration, using defaults when the file does not exist
pub fn load_config_or_default(path: &Path) -> Result<FloorwatchConfig> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(FloorwatchConfig::default())
    }
}
