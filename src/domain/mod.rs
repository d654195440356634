// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types and tables — no burn types, no file I/O.
//
//   vocab.rs     — the fixed jamo table and token id layout
//   hangul.rs    — syllable ⇄ jamo arithmetic
//   utterance.rs — a transcript/audio path pair
//   traits.rs    — seams the data layer is written against

/// Fixed jamo vocabulary and token id layout
pub mod vocab;

/// Hangul syllable decomposition and composition
pub mod hangul;

/// A transcript + PCM path pair
pub mod utterance;

/// Core abstractions (traits) that other layers implement
pub mod traits;
