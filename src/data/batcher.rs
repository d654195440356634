// ============================================================
// Layer 4 — Speech Batcher
// ============================================================
// Implements burn's Batcher trait: stacks variable-length
// SpeechSamples into zero-padded tensors.
//
// Shapes for a batch of N samples:
//   audio          [N, max_frames, n_mels]  Float
//   audio_lengths  [N]                      Int
//   text           [N, max_tokens]          Int
//   text_lengths   [N]                      Int
//
// max_frames / max_tokens are the longest sample in THIS batch,
// not a global limit. Padding is 0 in both tensors; the length
// tensors tell the model where the real data stops.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SpeechSample;

// ─── SpeechBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SpeechBatch<B: Backend> {
    /// Log-mel features — shape: [batch_size, max_frames, n_mels]
    pub audio: Tensor<B, 3>,

    /// Real frame count per sample — shape: [batch_size]
    pub audio_lengths: Tensor<B, 1, Int>,

    /// Token ids — shape: [batch_size, max_tokens]
    pub text: Tensor<B, 2, Int>,

    /// Real token count per sample — shape: [batch_size]
    pub text_lengths: Tensor<B, 1, Int>,
}

// ─── SpeechBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SpeechBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,
}

impl<B: Backend> SpeechBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SpeechSample, SpeechBatch<B>> for SpeechBatcher<B> {
    fn batch(&self, items: Vec<SpeechSample>) -> SpeechBatch<B> {
        let batch_size = items.len();
        let n_mels     = items.first().map_or(0, |s| s.n_mels);
        let max_frames = items.iter().map(|s| s.frames).max().unwrap_or(0);
        let max_tokens = items.iter().map(|s| s.tokens.len()).max().unwrap_or(0);

        // ── Pad audio ─────────────────────────────────────────────────────────
        // Each sample's rows are copied to the front of its slot;
        // the remaining rows stay zero.
        let slot = max_frames * n_mels;
        let mut audio_flat = vec![0.0f32; batch_size * slot];
        for (i, s) in items.iter().enumerate() {
            audio_flat[i * slot..i * slot + s.audio.len()].copy_from_slice(&s.audio);
        }

        // ── Pad text ──────────────────────────────────────────────────────────
        let mut text_flat = vec![0i32; batch_size * max_tokens];
        for (i, s) in items.iter().enumerate() {
            for (j, &token) in s.tokens.iter().enumerate() {
                text_flat[i * max_tokens + j] = token as i32;
            }
        }

        let audio_lengths: Vec<i32> = items.iter().map(|s| s.frames as i32).collect();
        let text_lengths:  Vec<i32> = items.iter().map(|s| s.tokens.len() as i32).collect();

        // ── Create tensors ────────────────────────────────────────────────────
        let audio = Tensor::<B, 1>::from_floats(audio_flat.as_slice(), &self.device)
            .reshape([batch_size, max_frames, n_mels]);

        let text = Tensor::<B, 1, Int>::from_ints(text_flat.as_slice(), &self.device)
            .reshape([batch_size, max_tokens]);

        SpeechBatch {
            audio,
            audio_lengths: Tensor::<B, 1, Int>::from_ints(audio_lengths.as_slice(), &self.device),
            text,
            text_lengths: Tensor::<B, 1, Int>::from_ints(text_lengths.as_slice(), &self.device),
        }
    }
}
