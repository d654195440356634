// ============================================================
// Layer 4 — Speech Dataset
// ============================================================
// Implements burn's Dataset trait over a list of utterances.
// Samples are built lazily on every get(), so a corpus of any
// size costs only its path list in memory.
//
// get(index):
//   1. transcript → refine_ksponspeech → text_to_tokens
//      too many tokens?  → try the next utterance
//   2. pcm → features
//      too many frames?  → try the next utterance
//   3. unreadable file?  → warn, try the next utterance
//
// "Next" wraps around (index + 1) % len, and at most len()
// utterances are tried, so get() returns None instead of spinning
// when nothing in the corpus fits the limits.

use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::data::{
    features::read_pcm,
    loader::read_transcript,
    normalizer::refine_ksponspeech,
    tokenizer::text_to_tokens,
};
use crate::domain::traits::{FeatureExtractor, Features};
use crate::domain::utterance::Utterance;

/// One utterance ready for batching.
/// The batcher pads many of these into one SpeechBatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSample {
    /// Log-mel features, row-major `[frames, n_mels]`.
    /// Row t holds the n_mels values of frame t.
    pub audio:  Vec<f32>,

    /// Number of feature frames (time steps) in `audio`.
    /// Becomes this sample's entry in `audio_lengths`.
    pub frames: usize,

    /// Feature bins per frame, 80 with the default MelConfig.
    pub n_mels: usize,

    /// Token ids of the refined transcript:
    /// < 256 are raw bytes, >= 256 index the jamo vocabulary.
    pub tokens: Vec<u32>,
}

impl SpeechSample {
    pub fn new(features: Features, tokens: Vec<u32>) -> Self {
        Self {
            audio:  features.data,
            frames: features.frames,
            n_mels: features.bins,
            tokens,
        }
    }
}

/// Length limits; longer utterances are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFilter {
    /// Transcripts with more tokens than this are skipped
    pub max_text_tokens:  usize,

    /// Audio with more frames than this is skipped
    /// (450 frames ≈ 7.2 s at hop 256 / 16 kHz)
    pub max_audio_frames: usize,
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self {
            max_text_tokens:  180,
            max_audio_frames: 450,
        }
    }
}

pub struct SpeechDataset {
    utterances: Vec<Utterance>,
    extractor:  Arc<dyn FeatureExtractor>,
    filter:     SampleFilter,
}

impl SpeechDataset {
    pub fn new(
        utterances: Vec<Utterance>,
        extractor:  Arc<dyn FeatureExtractor>,
        filter:     SampleFilter,
    ) -> Self {
        Self { utterances, extractor, filter }
    }

    /// Load one utterance. `Ok(None)` means it exceeds a length limit.
    fn load(&self, utterance: &Utterance) -> Result<Option<SpeechSample>> {
        let text   = refine_ksponspeech(&read_transcript(&utterance.txt)?);
        let tokens = text_to_tokens(&text);
        if tokens.len() > self.filter.max_text_tokens {
            tracing::debug!(
                "Skipping '{}': {} tokens",
                utterance.txt.display(),
                tokens.len()
            );
            return Ok(None);
        }

        let features = self.extractor.extract(&read_pcm(&utterance.pcm)?);
        if features.frames > self.filter.max_audio_frames {
            tracing::debug!(
                "Skipping '{}': {} frames",
                utterance.pcm.display(),
                features.frames
            );
            return Ok(None);
        }

        Ok(Some(SpeechSample::new(features, tokens)))
    }
}

impl Dataset<SpeechSample> for SpeechDataset {
    fn get(&self, index: usize) -> Option<SpeechSample> {
        let len = self.utterances.len();
        if index >= len {
            return None;
        }

        (0..len)
            .map(|offset| &self.utterances[(index + offset) % len])
            .find_map(|utterance| match self.load(utterance) {
                Ok(sample) => sample,
                Err(e) => {
                    tracing::warn!("Skipping '{}': {:#}", utterance.txt.display(), e);
                    None
                }
            })
    }

    fn len(&self) -> usize {
        self.utterances.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    /// One frame of `bins` constant values per 10 samples.
    struct Framer {
        bins: usize,
    }

    impl FeatureExtractor for Framer {
        fn extract(&self, samples: &[f32]) -> Features {
            let frames = samples.len() / 10;
            Features::new(frames, self.bins, vec![1.0; frames * self.bins])
        }
    }

    fn write_pair(dir: &Path, name: &str, text: &str, samples: usize) -> Utterance {
        let txt = dir.join(format!("{name}.txt"));
        let pcm = dir.join(format!("{name}.pcm"));
        let (encoded, _, _) = encoding_rs::EUC_KR.encode(text);
        fs::write(&txt, &encoded).unwrap();
        fs::write(&pcm, vec![0u8; samples * 2]).unwrap();
        Utterance::new(txt, pcm)
    }

    fn dataset(utterances: Vec<Utterance>, filter: SampleFilter) -> SpeechDataset {
        SpeechDataset::new(utterances, Arc::new(Framer { bins: 4 }), filter)
    }

    #[test]
    fn test_get_refines_and_tokenizes() {
        let dir = TempDir::new().unwrap();
        let u = write_pair(dir.path(), "a", "b/ 네  맞아요", 50);
        let ds = dataset(vec![u], SampleFilter::default());

        let sample = ds.get(0).unwrap();
        assert_eq!(sample.tokens, text_to_tokens("네 맞아요"));
        assert_eq!(sample.frames, 5);
        assert_eq!(sample.n_mels, 4);
        assert_eq!(sample.audio.len(), 20);
    }

    #[test]
    fn test_long_transcript_skips_to_next() {
        let dir = TempDir::new().unwrap();
        let long  = write_pair(dir.path(), "a", "아주 긴 문장입니다", 10);
        let short = write_pair(dir.path(), "b", "네", 10);
        let filter = SampleFilter { max_text_tokens: 5, max_audio_frames: 450 };
        let ds = dataset(vec![long, short], filter);

        assert_eq!(ds.get(0).unwrap().tokens, text_to_tokens("네"));
    }

    #[test]
    fn test_long_audio_wraps_around() {
        let dir = TempDir::new().unwrap();
        let fits = write_pair(dir.path(), "a", "하나", 10);
        let long = write_pair(dir.path(), "b", "둘", 100);
        let filter = SampleFilter { max_text_tokens: 180, max_audio_frames: 3 };
        let ds = dataset(vec![fits, long], filter);

        // index 1 is too long, wraps to index 0
        assert_eq!(ds.get(1).unwrap().tokens, text_to_tokens("하나"));
    }

    #[test]
    fn test_missing_pcm_is_skipped() {
        let dir = TempDir::new().unwrap();
        let mut broken = write_pair(dir.path(), "a", "하나", 10);
        broken.pcm = dir.path().join("missing.pcm");
        let ok = write_pair(dir.path(), "b", "둘", 10);
        let ds = dataset(vec![broken, ok], SampleFilter::default());

        assert_eq!(ds.get(0).unwrap().tokens, text_to_tokens("둘"));
    }

    #[test]
    fn test_nothing_fits_returns_none() {
        let dir = TempDir::new().unwrap();
        let a = write_pair(dir.path(), "a", "하나", 100);
        let b = write_pair(dir.path(), "b", "둘", 100);
        let filter = SampleFilter { max_text_tokens: 180, max_audio_frames: 1 };
        let ds = dataset(vec![a, b], filter);

        assert!(ds.get(0).is_none());
    }

    #[test]
    fn test_out_of_range_index() {
        let dir = TempDir::new().unwrap();
        let a = write_pair(dir.path(), "a", "하나", 10);
        let ds = dataset(vec![a], SampleFilter::default());

        assert_eq!(ds.len(), 1);
        assert!(ds.get(1).is_none());
    }
}
