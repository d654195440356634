// ============================================================
// Layer 4 — Audio Features
// ============================================================
// Raw PCM → normalised log-mel spectrogram, time-major.
//
// Pipeline:
//   1. read_pcm: 16-bit LE samples / 32768 → f32 in [-1, 1)
//   2. Reflect-pad n_fft/2 on both sides (centred frames)
//   3. Periodic Hann window, FFT, power spectrum |X|²
//   4. Slaney mel filterbank (area normalised), 0 Hz .. sr/2
//   5. S' = (log10(S + 1e-5) - log10(1e-5)) / -log10(1e-5)
//
// Step 5 maps silence to ~0 and loud bins to ~1 and above.
//
// Defaults: 16 kHz, n_fft 1024, hop 256, 80 mel bins.
// Frame count for n samples is 1 + n / hop (0 for empty input).

use anyhow::{Context, Result};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

use crate::domain::traits::{FeatureExtractor, Features};

/// Floor added before the log so silence stays finite.
const LOG_FLOOR: f64 = 1e-5;

/// Read a headerless 16-bit little-endian mono PCM file.
/// A trailing odd byte is ignored.
pub fn read_pcm(path: &Path) -> Result<Vec<f32>> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read audio '{}'", path.display()))?;

    Ok(bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect())
}

/// Mel spectrogram parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MelConfig {
    /// Samples per second of the input audio.
    /// KSponSpeech is recorded at 16 kHz.
    pub sample_rate: u32,

    /// FFT window size in samples.
    /// 1024 samples = 64 ms at 16 kHz, giving n_fft/2 + 1 = 513 bins.
    pub n_fft:       usize,

    /// Distance between the starts of two frames, in samples.
    /// 256 samples = 16 ms, so each second yields ~62 frames.
    pub hop_length:  usize,

    /// Number of mel filters, i.e. feature values per frame.
    pub n_mels:      usize,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            n_fft:       1024,
            hop_length:  256,
            n_mels:      80,
        }
    }
}

/// Log-mel feature extractor.
///
/// The window, mel filterbank and FFT plan are built once in
/// [`MelSpectrogram::new`] and shared by every call to `extract`.
#[derive(Clone)]
pub struct MelSpectrogram {
    config:     MelConfig,
    window:     Vec<f64>,
    filterbank: Vec<Vec<f64>>,
    fft:        Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for MelSpectrogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MelSpectrogram")
            .field("config", &self.config)
            .finish()
    }
}

impl MelSpectrogram {
    pub fn new(config: MelConfig) -> Self {
        let window = hann_window(config.n_fft);
        let filterbank = mel_filterbank(
            config.n_fft,
            config.n_mels,
            config.sample_rate,
            0.0,
            config.sample_rate as f64 / 2.0,
        );
        let fft = FftPlanner::new().plan_fft_forward(config.n_fft);

        Self { config, window, filterbank, fft }
    }

    /// Power spectrum of every centred frame, `n_fft/2 + 1` bins each.
    fn power_frames(&self, samples: &[f64]) -> Vec<Vec<f64>> {
        let n_fft = self.config.n_fft;
        let hop   = self.config.hop_length;
        let bins  = n_fft / 2 + 1;

        let padded = reflect_pad(samples, n_fft / 2);
        let num_frames = (padded.len() - n_fft) / hop + 1;

        let mut buffer = vec![Complex::new(0.0, 0.0); n_fft];
        let mut frames = Vec::with_capacity(num_frames);

        for frame in 0..num_frames {
            let start = frame * hop;
            for (i, slot) in buffer.iter_mut().enumerate() {
                *slot = Complex::new(padded[start + i] * self.window[i], 0.0);
            }
            self.fft.process(&mut buffer);
            frames.push(buffer[..bins].iter().map(|c| c.norm_sqr()).collect());
        }

        frames
    }
}

impl FeatureExtractor for MelSpectrogram {
    fn extract(&self, samples: &[f32]) -> Features {
        let n_mels = self.config.n_mels;
        if samples.is_empty() {
            return Features::new(0, n_mels, Vec::new());
        }

        let samples: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
        let power = self.power_frames(&samples);

        let log_floor = LOG_FLOOR.log10();
        let mut data = Vec::with_capacity(power.len() * n_mels);

        for spectrum in &power {
            for filter in &self.filterbank {
                let energy: f64 = filter
                    .iter()
                    .zip(spectrum)
                    .map(|(w, p)| w * p)
                    .sum();
                let scaled = ((energy + LOG_FLOOR).log10() - log_floor) / -log_floor;
                data.push(scaled as f32);
            }
        }

        Features::new(power.len(), n_mels, data)
    }
}

/// Periodic Hann window.
fn hann_window(length: usize) -> Vec<f64> {
    (0..length)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * i as f64 / length as f64;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}

/// Mirror `pad` samples onto both ends without repeating the edge
/// sample. Positions a short signal cannot mirror are zero.
fn reflect_pad(signal: &[f64], pad: usize) -> Vec<f64> {
    let len = signal.len();
    let mut padded = Vec::with_capacity(len + 2 * pad);

    // signal[pad], ..., signal[1]
    for i in (1..=pad).rev() {
        padded.push(if i < len { signal[i] } else { 0.0 });
    }

    padded.extend_from_slice(signal);

    // signal[len-2], signal[len-3], ...
    for i in 0..pad {
        padded.push(match len.checked_sub(2 + i) {
            Some(idx) => signal[idx],
            None      => 0.0,
        });
    }

    padded
}

/// Slaney-normalised triangular mel filterbank, `n_mels` rows of
/// `n_fft/2 + 1` weights.
fn mel_filterbank(
    n_fft: usize,
    n_mels: usize,
    sample_rate: u32,
    f_min: f64,
    f_max: f64,
) -> Vec<Vec<f64>> {
    let num_bins = n_fft / 2 + 1;
    let sr = sample_rate as f64;

    let mel_min = hz_to_mel(f_min);
    let mel_max = hz_to_mel(f_max);

    let hz_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
        .collect();

    let bin_freqs: Vec<f64> = (0..num_bins)
        .map(|i| sr * i as f64 / n_fft as f64)
        .collect();

    (0..n_mels)
        .map(|m| {
            let (left, center, right) = (hz_points[m], hz_points[m + 1], hz_points[m + 2]);
            let norm = 2.0 / (right - left);

            bin_freqs
                .iter()
                .map(|&f| {
                    let rising  = (f - left) / (center - left);
                    let falling = (right - f) / (right - center);
                    norm * rising.min(falling).max(0.0)
                })
                .collect()
        })
        .collect()
}

/// Slaney mel scale: linear below 1 kHz, logarithmic above.
fn hz_to_mel(hz: f64) -> f64 {
    if hz < 1000.0 {
        3.0 * hz / 200.0
    } else {
        15.0 + 27.0 * (hz / 1000.0).ln() / 6.4_f64.ln()
    }
}

fn mel_to_hz(mel: f64) -> f64 {
    if mel < 15.0 {
        200.0 * mel / 3.0
    } else {
        1000.0 * ((mel - 15.0) * 6.4_f64.ln() / 27.0).exp()
    }
}
