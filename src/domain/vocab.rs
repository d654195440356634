// ============================================================
// Layer 3 — Jamo Vocabulary
// ============================================================
// The closed symbol table shared by the tokenizer and any model
// that consumes its ids.
//
// Token id layout:
//   0   ..= 255          → one raw UTF-8 byte
//   256 ..  N_SYMBOLS    → JAMO_LIST[id - 256]
//
// The order of JAMO_LIST is part of the id contract: a trained
// model's embedding rows are indexed by it, so entries are
// never reordered, removed or inserted.
//
// Reference: https://namu.wiki/w/한글/자모

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Marks the end of one decomposed syllable (or standalone jamo).
pub const COMPOSE_CODE: char = 'ᴥ';

/// Number of ids reserved for raw bytes before the jamo entries start.
pub const BYTE_TOKENS: u32 = 256;

/// The jamo table. Compatibility jamo (U+3131..) throughout.
pub const JAMO_LIST: [char; 52] = [
    // Syllable terminator
    COMPOSE_CODE,
    // Basic consonants
    'ㄱ', 'ㄴ', 'ㄷ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅅ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
    // Double consonants
    'ㄲ', 'ㄸ', 'ㅃ', 'ㅆ', 'ㅉ',
    // Final consonant clusters
    'ㄳ', 'ㄵ', 'ㄶ', 'ㄺ', 'ㄻ', 'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ', 'ㅄ',
    // Basic vowels
    'ㅏ', 'ㅑ', 'ㅓ', 'ㅕ', 'ㅗ', 'ㅛ', 'ㅜ', 'ㅠ', 'ㅡ', 'ㅣ',
    // Compound vowels
    'ㅐ', 'ㅒ', 'ㅔ', 'ㅖ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅝ', 'ㅞ', 'ㅟ', 'ㅢ',
];

/// Total vocabulary size: every byte value plus every jamo entry.
/// Models must size their embedding / output layers with this.
pub const N_SYMBOLS: usize = BYTE_TOKENS as usize + JAMO_LIST.len();

lazy_static! {
    static ref JAMO_INDEX: HashMap<char, u32> = JAMO_LIST
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u32))
        .collect();
}

/// Position of `c` in [`JAMO_LIST`], if it is a vocabulary symbol.
pub fn jamo_index(c: char) -> Option<u32> {
    JAMO_INDEX.get(&c).copied()
}

/// Token id for a vocabulary symbol.
pub fn jamo_token(c: char) -> Option<u32> {
    jamo_index(c).map(|i| BYTE_TOKENS + i)
}

/// Symbol for a token id in the jamo range. `None` for byte ids and
/// for ids past the end of the table.
pub fn token_symbol(token: u32) -> Option<char> {
    let index = token.checked_sub(BYTE_TOKENS)?;
    JAMO_LIST.get(index as usize).copied()
}
