// ============================================================
// Layer 4 — Jamo Tokenizer
// ============================================================
// Text ⇄ token ids over the byte + jamo vocabulary.
//
// Encoding:
//   1. Decompose syllables into jamo + terminator ("강" → "ㄱㅏㅇᴥ")
//   2. A unit found in JAMO_LIST → one token (256 + position)
//   3. Anything else → its UTF-8 bytes, one token per byte
//
//   "강5" → [257, 287, 264, 256, 53]
//            ㄱ    ㅏ   ㅇ   ᴥ   '5'
//
// Decoding maps each token back on its own and then composes
// syllables again. Byte tokens are decoded one at a time, so a
// byte that is only part of a multi-byte character (>= 0x80)
// decodes to nothing: "é" encodes to [195, 169] and decodes to "".
// Round trips are exact only for Hangul + ASCII text.

use crate::domain::hangul::{compose, decompose};
use crate::domain::vocab::{jamo_token, token_symbol, BYTE_TOKENS};

/// Encode text into token ids. Never fails.
pub fn text_to_tokens(text: &str) -> Vec<u32> {
    let decomposed = decompose(text);
    let mut tokens = Vec::with_capacity(decomposed.len());
    let mut buf = [0u8; 4];

    for c in decomposed.chars() {
        match jamo_token(c) {
            Some(token) => tokens.push(token),
            None => tokens.extend(
                c.encode_utf8(&mut buf).bytes().map(u32::from),
            ),
        }
    }

    tokens
}

/// Decode token ids back into text (best effort, see module docs).
/// Ids at or beyond `N_SYMBOLS` are skipped.
pub fn tokens_to_text(tokens: &[u32]) -> String {
    let mut text = String::with_capacity(tokens.len());

    for &token in tokens {
        if token < BYTE_TOKENS {
            if let Some(c) = byte_to_char(token as u8) {
                text.push(c);
            }
        } else if let Some(symbol) = token_symbol(token) {
            text.push(symbol);
        } else {
            tracing::debug!("Dropping out-of-range token {}", token);
        }
    }

    compose(&text)
}

/// A single byte taken as a complete UTF-8 sequence on its own.
fn byte_to_char(byte: u8) -> Option<char> {
    std::str::from_utf8(&[byte]).ok()?.chars().next()
}
