// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores model + optimizer state keyed by training
// step, using burn's CompactRecorder (named MessagePack, half
// precision floats).
//
// Files for step 1200 under checkpoints/:
//
//   save_1200_model.mpk   ← model record
//   save_1200_optim.mpk   ← optimizer record (Adam moments …)
//   save_1200.json        ← {"step": 1200}
//
// The ".mpk" extension is the recorder's own; it is appended by
// burn, so record paths here are passed without one.
//
// The JSON sidecar is written last, so its presence means the
// checkpoint is complete; load() only looks for the sidecar.
//
// Restoring is forgiving about the optimizer: when its record
// cannot be loaded (optimizer changed, file missing) the model
// is still restored and training continues with fresh optimizer
// state. A model that cannot be restored is an error.

use anyhow::{Context, Result};
use burn::{
    module::AutodiffModule,
    optim::Optimizer,
    prelude::*,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

/// Contents of the `save_{step}.json` sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub step: u64,
}

/// Manages saving and loading of step-keyed checkpoints.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Base path of the checkpoint for `step`: `{dir}/save_{step}`.
    pub fn path_for(&self, step: u64) -> PathBuf {
        self.dir.join(format!("save_{step}"))
    }

    /// True if a complete checkpoint for `step` is on disk.
    pub fn exists(&self, step: u64) -> bool {
        meta_path(&self.path_for(step)).exists()
    }

    /// Record model and optimizer state for `step`.
    /// Returns the checkpoint's base path.
    pub fn save<B, M, O>(&self, step: u64, model: &M, optimizer: &O) -> Result<PathBuf>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", self.dir.display()))?;

        let base = self.path_for(step);
        let recorder = CompactRecorder::new();

        let model_path = suffixed(&base, "_model");
        <CompactRecorder as Recorder<B>>::record(&recorder, model.clone().into_record(), model_path.clone())
            .with_context(|| format!("Failed to save model to '{}'", model_path.display()))?;

        let optim_path = suffixed(&base, "_optim");
        <CompactRecorder as Recorder<B>>::record(&recorder, optimizer.to_record(), optim_path.clone())
            .with_context(|| format!("Failed to save optimizer to '{}'", optim_path.display()))?;

        let meta = meta_path(&base);
        fs::write(&meta, serde_json::to_string(&CheckpointMeta { step })?)
            .with_context(|| format!("Cannot write '{}'", meta.display()))?;

        tracing::info!("saved {}", base.display());
        Ok(base)
    }

    /// Restore the checkpoint for `step` (or the one at `path`, a base
    /// path as returned by [`save`](Self::save)).
    ///
    /// Returns `(model, optimizer, step)`. When no checkpoint exists the
    /// inputs come back unchanged along with the requested step.
    pub fn load<B, M, O>(
        &self,
        step: u64,
        model: M,
        optimizer: O,
        path: Option<&Path>,
        device: &B::Device,
    ) -> Result<(M, O, u64)>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        let base = path.map_or_else(|| self.path_for(step), Path::to_path_buf);
        let meta_file = meta_path(&base);

        if !meta_file.exists() {
            tracing::info!("No checkpoint at '{}', starting from step {}", base.display(), step);
            return Ok((model, optimizer, step));
        }

        let meta: CheckpointMeta = serde_json::from_str(
            &fs::read_to_string(&meta_file)
                .with_context(|| format!("Cannot read '{}'", meta_file.display()))?,
        )
        .with_context(|| format!("Checkpoint metadata '{}' is not valid JSON", meta_file.display()))?;

        let recorder = CompactRecorder::new();

        let model_path = suffixed(&base, "_model");
        let model_record = <CompactRecorder as Recorder<B>>::load::<M::Record>(
            &recorder,
            model_path.clone(),
            device,
        )
        .with_context(|| format!("Cannot load model from '{}'", model_path.display()))?;
        let model = model.load_record(model_record);

        let optim_path = suffixed(&base, "_optim");
        let optimizer = match <CompactRecorder as Recorder<B>>::load::<O::Record>(
            &recorder,
            optim_path.clone(),
            device,
        ) {
            Ok(record) => optimizer.load_record(record),
            Err(e) => {
                tracing::warn!(
                    "Optimizer state '{}' not restored ({}), keeping current optimizer",
                    optim_path.display(),
                    e
                );
                optimizer
            }
        };

        tracing::info!("loaded : {}", meta.step);
        Ok((model, optimizer, meta.step))
    }
}

fn meta_path(base: &Path) -> PathBuf {
    suffixed(base, ".json")
}

/// `base` with `suffix` appended to its file name.
fn suffixed(base: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = base.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{Autodiff, NdArray},
        nn::{Linear, LinearConfig},
        optim::AdamConfig,
        record::FileRecorder,
    };
    use tempfile::TempDir;

    type TestBackend = Autodiff<NdArray>;

    /// Record file written for `part` ("model" / "optim") of `step`.
    fn record_file(dir: &Path, step: u64, part: &str) -> PathBuf {
        let ext = <CompactRecorder as FileRecorder<TestBackend>>::file_extension();
        dir.join(format!("save_{step}_{part}.{ext}"))
    }

    fn weights(model: &Linear<TestBackend>) -> Vec<f32> {
        model.weight.val().into_data().to_vec::<f32>().unwrap()
    }

    fn linear(device: &<TestBackend as Backend>::Device) -> Linear<TestBackend> {
        LinearConfig::new(4, 3).init(device)
    }

    #[test]
    fn test_save_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let device = Default::default();
        let ckpt = CheckpointManager::new(dir.path().join("ckpt"));
        let model = linear(&device);
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();

        let base = ckpt.save(7, &model, &optim).unwrap();

        assert_eq!(base, dir.path().join("ckpt/save_7"));
        assert!(ckpt.exists(7));
        assert!(record_file(&dir.path().join("ckpt"), 7, "model").exists());
        assert!(record_file(&dir.path().join("ckpt"), 7, "optim").exists());
        assert!(dir.path().join("ckpt/save_7.json").exists());
        assert!(!ckpt.exists(8));
    }

    #[test]
    fn test_load_restores_weights_and_step() {
        let dir = TempDir::new().unwrap();
        let device = Default::default();
        let ckpt = CheckpointManager::new(dir.path());

        let saved = linear(&device);
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        ckpt.save(1200, &saved, &optim).unwrap();

        let fresh = linear(&device);
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        let (restored, _optim, step) = ckpt.load(1200, fresh, optim, None, &device).unwrap();

        assert_eq!(step, 1200);
        // CompactRecorder stores half precision
        for (a, b) in weights(&saved).iter().zip(weights(&restored)) {
            assert!((a - b).abs() < 1e-2, "{a} vs {b}");
        }
    }

    #[test]
    fn test_load_by_explicit_path() {
        let dir = TempDir::new().unwrap();
        let device = Default::default();
        let ckpt = CheckpointManager::new(dir.path().join("a"));
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        let base = ckpt.save(3, &linear(&device), &optim).unwrap();

        let other = CheckpointManager::new(dir.path().join("b"));
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        let (_, _, step) = other
            .load(0, linear(&device), optim, Some(&base), &device)
            .unwrap();
        assert_eq!(step, 3);
    }

    #[test]
    fn test_missing_checkpoint_returns_inputs() {
        let dir = TempDir::new().unwrap();
        let device = Default::default();
        let ckpt = CheckpointManager::new(dir.path());

        let model = linear(&device);
        let before = weights(&model);
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        let (model, _, step) = ckpt.load(42, model, optim, None, &device).unwrap();

        assert_eq!(step, 42);
        assert_eq!(weights(&model), before);
    }

    #[test]
    fn test_missing_optimizer_state_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let device = Default::default();
        let ckpt = CheckpointManager::new(dir.path());
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        ckpt.save(5, &linear(&device), &optim).unwrap();
        fs::remove_file(record_file(dir.path(), 5, "optim")).unwrap();

        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        let (_, _, step) = ckpt.load(5, linear(&device), optim, None, &device).unwrap();
        assert_eq!(step, 5);
    }

    #[test]
    fn test_missing_model_record_is_an_error() {
        let dir = TempDir::new().unwrap();
        let device = Default::default();
        let ckpt = CheckpointManager::new(dir.path());
        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        ckpt.save(5, &linear(&device), &optim).unwrap();
        fs::remove_file(record_file(dir.path(), 5, "model")).unwrap();

        let optim = AdamConfig::new().init::<TestBackend, Linear<TestBackend>>();
        assert!(ckpt.load(5, linear(&device), optim, None, &device).is_err());
    }
}
