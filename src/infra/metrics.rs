// ============================================================
// Layer 6 — Metric Log
// ============================================================
// Append-only per-key time series, persisted as JSON after every
// append so a crashed run loses nothing.
//
// Output file: {dir}/data.json
//
//   {
//     "loss":      [[100, 2.31], [200, 1.97]],
//     "test_loss": [[1000, 2.05]]
//   }
//
// Each point is [step, value]. "loss" and "test_loss" always
// exist; any other key starts a new series on first use.
//
// Writes go through a temp file in the same directory followed
// by a rename, so data.json is never left half written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// One recorded point: (step, value). Serialised as `[step, value]`.
pub type MetricPoint = (u64, f64);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
struct MetricData(BTreeMap<String, Vec<MetricPoint>>);

impl MetricData {
    fn fresh() -> Self {
        let mut series = BTreeMap::new();
        series.insert("loss".to_string(), Vec::new());
        series.insert("test_loss".to_string(), Vec::new());
        Self(series)
    }
}

/// Training metric time series backed by `data.json`.
pub struct MetricLog {
    dir:       PathBuf,
    json_path: PathBuf,
    data:      MetricData,
}

impl MetricLog {
    /// Open the log in `dir`. An existing `data.json` is loaded unless
    /// `new` is true, in which case it is replaced on the next append.
    pub fn open(dir: impl Into<PathBuf>, new: bool) -> Result<Self> {
        let dir = dir.into();
        let json_path = dir.join("data.json");

        let data = if json_path.exists() && !new {
            let json = fs::read_to_string(&json_path)
                .with_context(|| format!("Cannot read metric log '{}'", json_path.display()))?;
            let data: MetricData = serde_json::from_str(&json)
                .with_context(|| format!("Metric log '{}' is not valid JSON", json_path.display()))?;
            tracing::debug!("Loaded metric log '{}'", json_path.display());
            data
        } else {
            MetricData::fresh()
        };

        Ok(Self { dir, json_path, data })
    }

    /// Append `[step, value]` to `key` and persist the whole log.
    pub fn log(&mut self, step: u64, key: &str, value: f64) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        self.data.0.entry(key.to_string()).or_default().push((step, value));
        self.persist()?;

        tracing::debug!("Logged {}={:.4} at step {}", key, value, step);
        Ok(())
    }

    /// Points recorded for `key`, oldest first.
    pub fn series(&self, key: &str) -> &[MetricPoint] {
        self.data.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Most recent point for `key`.
    pub fn last(&self, key: &str) -> Option<MetricPoint> {
        self.series(key).last().copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.0.keys().map(String::as_str)
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    fn persist(&self) -> Result<()> {
        let temp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Cannot create temp file in '{}'", self.dir.display()))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer(&mut writer, &self.data)?;
            writer.flush()?;
        }
        temp.persist(&self.json_path)
            .with_context(|| format!("Cannot write metric log '{}'", self.json_path.display()))?;
        Ok(())
    }
}
