// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a KsponSpeech utterance on disk to a padded
// tensor batch:
//
//   *.txt / *.pcm pairs
//       │
//       ▼
//   CorpusScanner     → finds utterances, reads CP949 transcripts
//       │
//       ▼
//   normalizer        → refine_ksponspeech: drops tags and dual scripts
//       │
//       ▼
//   tokenizer         → text_to_tokens: bytes + jamo ids
//       │
//       ▼
//   MelSpectrogram    → pcm → log-mel frames
//       │
//       ▼
//   SpeechDataset     → burn Dataset, skips over-long utterances
//       │
//       ▼
//   SpeechBatcher     → zero-padded tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Transcript cleanup
pub mod normalizer;

/// Text ↔ token ids
pub mod tokenizer;

/// Corpus discovery and transcript decoding
pub mod loader;

/// Raw PCM reading and log-mel features
pub mod features;

/// Implements burn's Dataset trait for speech samples
pub mod dataset;

/// Implements burn's Batcher trait for speech samples
pub mod batcher;
