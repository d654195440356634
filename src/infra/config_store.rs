// ============================================================
// Layer 6 — Config Store
// ============================================================
// Persists the effective PrepConfig next to the run outputs so a
// later training run can rebuild exactly the same features and
// length filters.
//
// Output file: {dir}/prep_config.json (pretty printed)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::application::inspect_use_case::PrepConfig;

const CONFIG_FILE: &str = "prep_config.json";

pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Write the config, creating the directory if needed.
    pub fn save(&self, cfg: &PrepConfig) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.path();
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved prep config to '{}'", path.display());
        Ok(path)
    }

    pub fn load(&self) -> Result<PrepConfig> {
        let path = self.path();
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'inspect' first.",
                    path.display()
                )
            })?;

        Ok(serde_json::from_str(&json)?)
    }
}
