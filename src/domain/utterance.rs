// ============================================================
// Layer 3 — Utterance Domain Type
// ============================================================
// One corpus entry: a transcript file and the raw PCM file that
// was recorded for it. KSponSpeech stores them side by side:
//
//   KsponSpeech_01/KsponSpeech_0001/KsponSpeech_000001.txt
//   KsponSpeech_01/KsponSpeech_0001/KsponSpeech_000001.pcm
//
// Nothing here touches the filesystem — existence of the pcm
// file is only checked when the sample is actually loaded.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A transcript / audio path pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Utterance {
    /// Transcript path (CP949 text)
    pub txt: PathBuf,

    /// Headerless 16-bit PCM path
    pub pcm: PathBuf,
}

impl Utterance {
    pub fn new(txt: impl Into<PathBuf>, pcm: impl Into<PathBuf>) -> Self {
        Self {
            txt: txt.into(),
            pcm: pcm.into(),
        }
    }

    /// Pair a transcript with its audio by swapping the trailing "txt"
    /// of the path for "pcm". Returns `None` if the path does not end
    /// in "txt" or is not valid UTF-8.
    pub fn from_transcript(txt: &Path) -> Option<Self> {
        let s = txt.to_str()?;
        let stem = s.strip_suffix("txt")?;
        Some(Self::new(txt, format!("{stem}pcm")))
    }
}
