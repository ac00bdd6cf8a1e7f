use super::FloorwatchConfig;

/// Settings taken from `FLOORWATCH_*` environment variables.
///
/// Applied on top of the file config, so a deployment can repoint the
/// client without editing TOML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub backend_url: Option<String>,
    pub asset_root: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read overrides through `lookup`; unparsable values are ignored
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut overrides = Self::default();

        if let Some(v) = lookup("FLOORWATCH_BACKEND_URL") {
            if !v.is_empty() {
                overrides.backend_url = Some(v);
            }
        }
        if let Some(v) = lookup("FLOORWATCH_ASSET_ROOT") {
            if !v.is_empty() {
                overrides.asset_root = Some(v);
            }
        }
        if let Some(v) = lookup("FLOORWATCH_POLL_INTERVAL_MS") {
            if let Ok(n) = v.parse::<u64>() {
                overrides.poll_interval_ms = Some(n);
            }
        }

        overrides
    }

    pub fn apply(&self, config: &mut FloorwatchConfig) {
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }
        if let Some(root) = &self.asset_root {
            config.assets.root = root.clone();
        }
        if let Some(interval) = self.poll_interval_ms {
            for family in config.families_mut() {
                family.poll_interval_ms = interval;
            }
        }
    }
}
