// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Runs the data pipeline end to end without a model, so a corpus
// can be checked before any training starts:
//
//   Step 1: Scan the corpus               (Layer 4 - data)
//   Step 2: Measure total audio size      (Layer 6 - infra)
//   Step 3: Build the feature extractor   (Layer 4 - data)
//   Step 4: Build the dataset             (Layer 4 - data)
//   Step 5: Save config                   (Layer 6 - infra)
//   Step 6: Batch the first few samples   (Layer 4 - data)
//   Step 7: Log per-batch lengths         (Layer 6 - infra)

use anyhow::Result;
use burn::{backend::NdArray, data::dataloader::DataLoaderBuilder};
use serde::{Deserialize, Serialize};
use std::{fs, sync::Arc};

use crate::data::{
    batcher::SpeechBatcher,
    dataset::{SampleFilter, SpeechDataset},
    features::{MelConfig, MelSpectrogram},
    loader::CorpusScanner,
};
use crate::domain::traits::UtteranceSource;
use crate::domain::utterance::Utterance;
use crate::infra::{config_store::ConfigStore, format::human_size, metrics::MetricLog};

type InspectBackend = NdArray;

// ─── Preparation Configuration ───────────────────────────────────────────────
// Everything that decides what a batch looks like. Saved as JSON so
// training can rebuild identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepConfig {
    /// Corpus root, searched recursively for *.txt / *.pcm pairs
    pub data_dir:    String,

    /// Where prep_config.json and the data.json metric log go
    pub out_dir:     String,

    /// Samples stacked into one padded batch
    pub batch_size:  usize,

    /// Stop inspecting after this many batches.
    /// Keeps a quick check quick on a 1000-hour corpus.
    pub max_batches: usize,

    /// Token / frame limits; longer utterances are skipped
    pub filter:      SampleFilter,

    /// Log-mel parameters. Training must use the same values,
    /// otherwise its inputs will not match what was inspected.
    pub mel:         MelConfig,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            data_dir:    "data/KsponSpeech".to_string(),
            out_dir:     "runs".to_string(),
            batch_size:  16,
            max_batches: 4,
            filter:      SampleFilter::default(),
            mel:         MelConfig::default(),
        }
    }
}

/// What the inspection found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectReport {
    /// Transcript files found under data_dir
    pub utterances:  usize,

    /// Total size of the pcm files that exist
    pub audio_bytes: u64,

    /// Batches actually produced (at most max_batches)
    pub batches:     usize,

    /// Samples across those batches
    pub samples:     usize,

    /// Longest padded audio dimension seen
    pub max_frames:  usize,

    /// Longest padded text dimension seen
    pub max_tokens:  usize,
}

pub struct InspectUseCase {
    config: PrepConfig,
}

impl InspectUseCase {
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let cfg = &self.config;

        // ── Step 1: Scan the corpus ───────────────────────────────────────────
        let utterances = CorpusScanner::new(&cfg.data_dir).utterances()?;

        // ── Step 2: Total audio size ──────────────────────────────────────────
        let audio_bytes = total_audio_bytes(&utterances);
        tracing::info!(
            "{} utterances, {} of audio",
            utterances.len(),
            human_size(audio_bytes)
        );

        let mut report = InspectReport {
            utterances: utterances.len(),
            audio_bytes,
            ..InspectReport::default()
        };

        // ── Step 3 + 4: Features and dataset ──────────────────────────────────
        let mel     = MelSpectrogram::new(cfg.mel.clone());
        let dataset = SpeechDataset::new(utterances, Arc::new(mel), cfg.filter);

        // ── Step 5: Save config ───────────────────────────────────────────────
        ConfigStore::new(&cfg.out_dir).save(cfg)?;

        if report.utterances == 0 {
            tracing::warn!("Corpus is empty, nothing to batch");
            return Ok(report);
        }

        // ── Step 6 + 7: Batch and log ─────────────────────────────────────────
        let batcher = SpeechBatcher::<InspectBackend>::new(Default::default());
        let loader  = DataLoaderBuilder::new(batcher)
            .batch_size(cfg.batch_size)
            .build(dataset);

        let mut metrics = MetricLog::open(&cfg.out_dir, true)?;

        for (index, batch) in loader.iter().take(cfg.max_batches).enumerate() {
            let [n, frames, mels] = batch.audio.dims();
            let [_, tokens]       = batch.text.dims();

            tracing::info!(
                "batch {:>3}: audio [{}, {}, {}], text [{}, {}]",
                index, n, frames, mels, n, tokens
            );

            let mean_frames = mean(&batch.audio_lengths.into_data().iter::<i64>().collect::<Vec<_>>());
            let mean_tokens = mean(&batch.text_lengths.into_data().iter::<i64>().collect::<Vec<_>>());
            metrics.log(index as u64, "audio_frames", mean_frames)?;
            metrics.log(index as u64, "text_tokens", mean_tokens)?;

            report.batches   += 1;
            report.samples   += n;
            report.max_frames = report.max_frames.max(frames);
            report.max_tokens = report.max_tokens.max(tokens);
        }

        tracing::info!(
            "Inspected {} batches, metrics in '{}'",
            report.batches,
            metrics.json_path().display()
        );
        Ok(report)
    }
}

fn total_audio_bytes(utterances: &[Utterance]) -> u64 {
    utterances
        .iter()
        .filter_map(|u| match fs::metadata(&u.pcm) {
            Ok(meta) => Some(meta.len()),
            Err(_) => {
                tracing::debug!("No audio for '{}'", u.txt.display());
                None
            }
        })
        .sum()
}

fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config_store::ConfigStore;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_pair(dir: &Path, name: &str, text: &str, samples: usize) {
        fs::create_dir_all(dir).unwrap();
        let (encoded, _, _) = encoding_rs::EUC_KR.encode(text);
        fs::write(dir.join(format!("{name}.txt")), &encoded).unwrap();
        fs::write(dir.join(format!("{name}.pcm")), vec![0u8; samples * 2]).unwrap();
    }

    fn config(root: &Path) -> PrepConfig {
        PrepConfig {
            data_dir:    root.join("corpus").display().to_string(),
            out_dir:     root.join("out").display().to_string(),
            batch_size:  2,
            max_batches: 10,
            ..PrepConfig::default()
        }
    }

    #[test]
    fn test_inspect_batches_corpus() {
        let dir = TempDir::new().unwrap();
        let corpus = dir.path().join("corpus");
        write_pair(&corpus.join("a"), "KsponSpeech_000001", "안녕하세요", 2560);
        write_pair(&corpus.join("a"), "KsponSpeech_000002", "b/ 네", 5120);
        write_pair(&corpus.join("b"), "KsponSpeech_000003", "(3)/(삼) 시", 256);

        let cfg = config(dir.path());
        let report = InspectUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(report.utterances, 3);
        assert_eq!(report.audio_bytes, (2560 + 5120 + 256) * 2);
        assert_eq!(report.batches, 2);
        assert_eq!(report.samples, 3);
        // 5120 samples / hop 256 + 1
        assert_eq!(report.max_frames, 21);

        let saved = ConfigStore::new(&cfg.out_dir).load().unwrap();
        assert_eq!(saved, cfg);

        let log = MetricLog::open(&cfg.out_dir, false).unwrap();
        assert_eq!(log.series("audio_frames").len(), 2);
    }

    #[test]
    fn test_inspect_empty_corpus() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("corpus")).unwrap();

        let report = InspectUseCase::new(config(dir.path())).execute().unwrap();
        assert_eq!(report, InspectReport::default());
    }

    #[test]
    fn test_inspect_missing_corpus_fails() {
        let dir = TempDir::new().unwrap();
        assert!(InspectUseCase::new(config(dir.path())).execute().is_err());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1, 2, 3, 4]), 2.5);
    }
}
