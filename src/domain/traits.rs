// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The data pipeline depends on these seams, not on the concrete
// directory walker or the FFT-based feature extractor, so tests
// can swap in small in-memory versions.

use anyhow::Result;
use crate::domain::utterance::Utterance;

// ─── UtteranceSource ──────────────────────────────────────────────────────────
/// Anything that can list the transcript/audio pairs of a corpus.
///
/// Implementations:
///   - CorpusScanner → walks a KSponSpeech directory tree
pub trait UtteranceSource {
    fn utterances(&self) -> Result<Vec<Utterance>>;
}

// ─── FeatureExtractor ─────────────────────────────────────────────────────────
/// Turns raw samples into a time-major feature matrix.
///
/// Implementations:
///   - MelSpectrogram → log-scaled mel power spectrogram
pub trait FeatureExtractor: Send + Sync {
    /// `samples` are mono floats in [-1, 1). Output is row-major
    /// `[frames, bins]`.
    fn extract(&self, samples: &[f32]) -> Features;
}

/// A time-major feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    pub frames: usize,
    pub bins:   usize,
    /// Row-major, `frames * bins` values
    pub data:   Vec<f32>,
}

impl Features {
    pub fn new(frames: usize, bins: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), frames * bins);
        Self { frames, bins, data }
    }

    /// One frame's worth of bins, or `None` past the last frame.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        if index >= self.frames {
            return None;
        }
        self.data.get(index * self.bins..(index + 1) * self.bins)
    }
}
