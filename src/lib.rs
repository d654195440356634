// ============================================================
// kspon-prep — library root
// ============================================================
// Layer 2  application  use cases
// Layer 3  domain       vocabulary, Hangul arithmetic, shared traits
// Layer 4  data         normalizer, tokenizer, features, dataset, batcher
// Layer 6  infra        checkpoints, metric log, config, formatting

pub mod application;
pub mod data;
pub mod domain;
pub mod infra;

pub use data::normalizer::refine_ksponspeech;
pub use data::tokenizer::{text_to_tokens, tokens_to_text};
pub use domain::vocab::N_SYMBOLS;
