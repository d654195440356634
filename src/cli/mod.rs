// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to the
// library. Only this layer prints to stdout.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DecodeArgs, EncodeArgs, InspectArgs};
use kspon_prep::{
    application::inspect_use_case::InspectUseCase,
    infra::format::human_size,
    refine_ksponspeech, text_to_tokens, tokens_to_text,
};

#[derive(Parser, Debug)]
#[command(
    name = "kspon-prep",
    version = "0.1.0",
    about = "KsponSpeech data preparation: transcript cleanup, jamo tokens, batch inspection."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Encode(args)  => run_encode(args),
            Commands::Decode(args)  => run_decode(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let text = if args.raw {
        args.text
    } else {
        refine_ksponspeech(&args.text)
    };
    tracing::debug!("Encoding '{}'", text);

    println!("{}", serde_json::to_string(&text_to_tokens(&text))?);
    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    println!("{}", tokens_to_text(&args.token_ids()?));
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    tracing::info!("Inspecting corpus in: {}", args.data_dir);

    let report = InspectUseCase::new(args.into()).execute()?;

    println!("utterances : {}", report.utterances);
    println!("audio      : {}", human_size(report.audio_bytes));
    println!("batches    : {} ({} samples)", report.batches, report.samples);
    println!("max frames : {}", report.max_frames);
    println!("max tokens : {}", report.max_tokens);
    Ok(())
}
