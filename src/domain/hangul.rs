// ============================================================
// Layer 3 — Hangul Syllable Decomposition / Composition
// ============================================================
// A precomposed syllable in U+AC00..=U+D7A3 is arithmetic:
//
//   code = 0xAC00 + (initial * 21 + vowel) * 28 + final
//
// with 19 initials, 21 vowels and 28 finals (final 0 = none).
// Decomposition emits compatibility jamo followed by the
// COMPOSE_CODE terminator, so composition can find syllable
// borders again without guessing:
//
//   "강a" → "ㄱㅏㅇᴥa"
//   "ㅋㅋ" → "ㅋᴥㅋᴥ"
//
// A text that already contains a literal 'ᴥ' does not survive
// decompose → compose; the terminator is reserved.

use crate::domain::vocab::COMPOSE_CODE;

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const VOWEL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

/// Compatibility jamo range for standalone letters (ㄱ..ㅣ).
const JAMO_FIRST: u32 = 0x3131;
const JAMO_LAST: u32 = 0x3163;

const INITIALS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ',
    'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

const VOWELS: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ',
    'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ', 'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

// Index 0 is "no final consonant" and has no letter.
const FINALS: [char; 27] = [
    'ㄱ', 'ㄲ', 'ㄳ', 'ㄴ', 'ㄵ', 'ㄶ', 'ㄷ', 'ㄹ', 'ㄺ', 'ㄻ',
    'ㄼ', 'ㄽ', 'ㄾ', 'ㄿ', 'ㅀ', 'ㅁ', 'ㅂ', 'ㅄ', 'ㅅ', 'ㅆ',
    'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

/// True for a precomposed Hangul syllable block.
pub fn is_syllable(c: char) -> bool {
    (SYLLABLE_BASE..=SYLLABLE_LAST).contains(&(c as u32))
}

/// True for a standalone compatibility consonant or vowel.
pub fn is_jamo(c: char) -> bool {
    (JAMO_FIRST..=JAMO_LAST).contains(&(c as u32))
}

/// Split one syllable into (initial, vowel, final).
/// Returns `None` for anything that is not a precomposed syllable.
pub fn split_syllable(c: char) -> Option<(char, char, Option<char>)> {
    if !is_syllable(c) {
        return None;
    }
    let offset = c as u32 - SYLLABLE_BASE;
    let initial = offset / (VOWEL_COUNT * FINAL_COUNT);
    let vowel = (offset % (VOWEL_COUNT * FINAL_COUNT)) / FINAL_COUNT;
    let last = offset % FINAL_COUNT;

    let final_consonant = match last {
        0 => None,
        n => Some(FINALS[n as usize - 1]),
    };
    Some((INITIALS[initial as usize], VOWELS[vowel as usize], final_consonant))
}

/// Build a syllable from its parts. `None` if any part cannot take
/// its position (e.g. a vowel where an initial is expected, or ㄸ as a final).
pub fn join_syllable(initial: char, vowel: char, final_consonant: Option<char>) -> Option<char> {
    let i = INITIALS.iter().position(|&x| x == initial)? as u32;
    let v = VOWELS.iter().position(|&x| x == vowel)? as u32;
    let f = match final_consonant {
        None => 0,
        Some(fc) => FINALS.iter().position(|&x| x == fc)? as u32 + 1,
    };
    char::from_u32(SYLLABLE_BASE + (i * VOWEL_COUNT + v) * FINAL_COUNT + f)
}

/// Decompose every syllable and standalone jamo, each followed by
/// [`COMPOSE_CODE`]. All other characters pass through unchanged.
pub fn decompose(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        if let Some((initial, vowel, final_consonant)) = split_syllable(c) {
            out.push(initial);
            out.push(vowel);
            if let Some(fc) = final_consonant {
                out.push(fc);
            }
            out.push(COMPOSE_CODE);
        } else if is_jamo(c) {
            out.push(c);
            out.push(COMPOSE_CODE);
        } else {
            out.push(c);
        }
    }
    out
}

/// Inverse of [`decompose`]. Each terminator closes a segment whose tail
/// is rebuilt into a syllable when it spells one; anything else in the
/// segment is copied as-is. A trailing segment without terminator is
/// copied unchanged.
pub fn compose(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut segment: Vec<char> = Vec::new();

    for c in text.chars() {
        if c == COMPOSE_CODE {
            flush_segment(&segment, &mut out);
            segment.clear();
        } else {
            segment.push(c);
        }
    }
    out.extend(segment);
    out
}

fn flush_segment(segment: &[char], out: &mut String) {
    let n = segment.len();

    // initial + vowel + final
    if n >= 3 {
        if let Some(s) = join_syllable(segment[n - 3], segment[n - 2], Some(segment[n - 1])) {
            out.extend(&segment[..n - 3]);
            out.push(s);
            return;
        }
    }

    // initial + vowel
    if n >= 2 {
        if let Some(s) = join_syllable(segment[n - 2], segment[n - 1], None) {
            out.extend(&segment[..n - 2]);
            out.push(s);
            return;
        }
    }

    // standalone jamo, or a tail that spells nothing
    out.extend(segment);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_with_final() {
        assert_eq!(split_syllable('강'), Some(('ㄱ', 'ㅏ', Some('ㅇ'))));
    }

    #[test]
    fn test_split_without_final() {
        assert_eq!(split_syllable('가'), Some(('ㄱ', 'ㅏ', None)));
    }

    #[test]
    fn test_split_cluster_final() {
        // 닭 = ㄷ + ㅏ + ㄺ
        assert_eq!(split_syllable('닭'), Some(('ㄷ', 'ㅏ', Some('ㄺ'))));
    }

    #[test]
    fn test_split_range_edges() {
        assert_eq!(split_syllable('\u{AC00}'), Some(('ㄱ', 'ㅏ', None)));
        assert_eq!(split_syllable('\u{D7A3}'), Some(('ㅎ', 'ㅣ', Some('ㅎ'))));
        assert_eq!(split_syllable('a'), None);
        assert_eq!(split_syllable('ㄱ'), None);
    }

    #[test]
    fn test_join_rejects_bad_positions() {
        assert_eq!(join_syllable('ㅏ', 'ㄱ', None), None);
        // ㄸ never appears as a final consonant
        assert_eq!(join_syllable('ㄱ', 'ㅏ', Some('ㄸ')), None);
    }

    #[test]
    fn test_join_inverts_split_for_every_syllable() {
        for code in SYLLABLE_BASE..=SYLLABLE_LAST {
            let c = char::from_u32(code).unwrap();
            let (i, v, f) = split_syllable(c).unwrap();
            assert_eq!(join_syllable(i, v, f), Some(c));
        }
    }

    #[test]
    fn test_decompose_marks_every_syllable() {
        assert_eq!(decompose("강a"), "ㄱㅏㅇᴥa");
        assert_eq!(decompose("ㅋㅋ"), "ㅋᴥㅋᴥ");
        assert_eq!(decompose("hi 5"), "hi 5");
    }

    #[test]
    fn test_jamo_range_stops_at_i() {
        // ㅣ (U+3163) is the last marked letter; archaic ㅥ and ㆍ pass through
        assert_eq!(decompose("ㄱㅣ"), "ㄱᴥㅣᴥ");
        assert_eq!(decompose("\u{3164}\u{3165}\u{318D}"), "\u{3164}\u{3165}\u{318D}");
    }

    #[test]
    fn test_compose_inverts_decompose() {
        for text in ["안녕하세요", "각 가", "ㅋㅋ 웃겨", "abc 닭갈비 123", "ㅏ가"] {
            assert_eq!(compose(&decompose(text)), text);
        }
    }

    #[test]
    fn test_compose_keeps_unterminated_tail() {
        assert_eq!(compose("ㄱㅏ"), "ㄱㅏ");
    }

    #[test]
    fn test_compose_with_prefix_in_segment() {
        assert_eq!(compose("xyㄱㅏㅇᴥ"), "xy강");
    }
}
