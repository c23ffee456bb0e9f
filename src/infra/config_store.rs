// ============================================================
// Layer 6 - Config Store
// ============================================================
// Saves and restores the pipeline configuration as JSON, so the
// exact alignment and padding settings used to prepare a
// training set can be reapplied at inference time.
//
// File layout:
//   <dir>/
//     prep_config.json   ← PipelineConfig, pretty-printed
//
// Any field missing from the file takes its default value.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::application::pipeline::PipelineConfig;

pub const CONFIG_FILE: &str = "prep_config.json";

/// Reads and writes `prep_config.json` in one directory.
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

    /// Write the configuration, creating the directory if needed.
    pub fn save(&self, cfg: &PipelineConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create config dir '{}'", self.dir.display()))?;

        let path = self.path();
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved preparation config to '{}'", path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<PipelineConfig> {
        let path = self.path();

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))
    }
}
