// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands:
//   encode   text → token ids
//   decode   token ids → text
//   inspect  run the corpus through the data pipeline
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use kspon_prep::application::inspect_use_case::PrepConfig;
use kspon_prep::data::{dataset::SampleFilter, features::MelConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refine a transcript and print its token ids as JSON
    Encode(EncodeArgs),

    /// Turn comma separated token ids back into text
    Decode(DecodeArgs),

    /// Scan a KsponSpeech corpus and batch the first few samples
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Transcript text
    #[arg(long)]
    pub text: String,

    /// Tokenize the text as given, without refine_ksponspeech
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Token ids, e.g. "272,283,264,0"
    #[arg(long)]
    pub tokens: String,
}

impl DecodeArgs {
    pub fn token_ids(&self) -> Result<Vec<u32>> {
        self.tokens
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u32>().with_context(|| format!("'{s}' is not a token id")))
            .collect()
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Root of the corpus; searched recursively for *.txt / *.pcm pairs
    #[arg(long, default_value = "data/KsponSpeech")]
    pub data_dir: String,

    /// Where prep_config.json and data.json are written
    #[arg(long, default_value = "runs")]
    pub out_dir: String,

    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Stop after this many batches
    #[arg(long, default_value_t = 4)]
    pub max_batches: usize,

    /// Skip transcripts with more tokens than this
    #[arg(long, default_value_t = 180)]
    pub max_text_tokens: usize,

    /// Skip audio with more frames than this
    #[arg(long, default_value_t = 450)]
    pub max_audio_frames: usize,
}

/// The application layer never sees clap types.
impl From<InspectArgs> for PrepConfig {
    fn from(a: InspectArgs) -> Self {
        PrepConfig {
            data_dir:    a.data_dir,
            out_dir:     a.out_dir,
            batch_size:  a.batch_size,
            max_batches: a.max_batches,
            filter:      SampleFilter {
                max_text_tokens:  a.max_text_tokens,
                max_audio_frames: a.max_audio_frames,
            },
            mel:         MelConfig::default(),
        }
    }
}
