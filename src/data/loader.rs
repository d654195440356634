// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Walks a KSponSpeech directory tree and pairs every transcript
// with the PCM recording stored next to it.
//
// Corpus layout:
//   root/
//     KsponSpeech_01/
//       KsponSpeech_0001/
//         KsponSpeech_000001.txt   ← CP949 transcript
//         KsponSpeech_000001.pcm   ← 16 kHz, 16-bit LE, mono, no header
//         ...
//
// Every file whose name ends in "txt" becomes one Utterance; the
// pcm file is not checked here, the dataset reports it missing
// when the sample is loaded.
//
// Transcripts are CP949 (the Windows superset of EUC-KR); decoding
// goes through encoding_rs, whose EUC_KR encoding is exactly that.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::traits::UtteranceSource;
use crate::domain::utterance::Utterance;

/// Lists every transcript/audio pair under a root directory.
/// Implements the UtteranceSource trait from Layer 3.
pub struct CorpusScanner {
    /// Corpus root directory
    root: PathBuf,
}

impl CorpusScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl UtteranceSource for CorpusScanner {
    fn utterances(&self) -> Result<Vec<Utterance>> {
        if !self.root.is_dir() {
            anyhow::bail!(
                "Corpus directory '{}' does not exist or is not a directory",
                self.root.display()
            );
        }

        let mut found = Vec::new();
        walk(&self.root, &mut found)?;

        // read_dir order is platform dependent
        found.sort();

        tracing::info!(
            "Found {} utterances under '{}'",
            found.len(),
            self.root.display()
        );
        Ok(found)
    }
}

/// Depth-first walk collecting transcript pairs into `found`.
fn walk(dir: &Path, found: &mut Vec<Utterance>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory '{}'", dir.display()))?;

    for entry in entries {
        let entry = entry
            .with_context(|| format!("Cannot read entry in '{}'", dir.display()))?;
        let path = entry.path();

        if path.is_dir() {
            walk(&path, found)?;
        } else if path.is_file() {
            let is_transcript = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with("txt"));

            if !is_transcript {
                continue;
            }

            match Utterance::from_transcript(&path) {
                Some(u) => found.push(u),
                None => tracing::warn!("Skipping non UTF-8 path '{}'", path.display()),
            }
        }
    }

    Ok(())
}

/// Read a CP949 transcript into a String.
///
/// Undecodable byte sequences become U+FFFD; that is logged but
/// not treated as an error.
pub fn read_transcript(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read transcript '{}'", path.display()))?;

    let (text, _, had_errors) = encoding_rs::EUC_KR.decode(&bytes);
    if had_errors {
        tracing::warn!(
            "Transcript '{}' is not valid CP949, replaced bad sequences",
            path.display()
        );
    }

    Ok(text.into_owned())
}
