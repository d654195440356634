// ============================================================
// Layer 4 — Transcript Normalizer
// ============================================================
// KSponSpeech transcripts carry transcription markup that must
// never reach the tokenizer:
//
//   (철자전사)/(발음전사)  dual transcription — keep the pronounced form
//   b/ l/ o/ n/           breath, laugh, overlapping speech, noise
//   u/                    unintelligible
//   *                     uncertain word / simultaneous noise
//   /                     filler marker
//   +                     repeated or corrected word
//
// Passes (applied in order):
//   1. Collapse dual transcriptions
//   2. Strip annotation tags
//   3. Collapse runs of spaces
//   4. Trim
//
// Example:
//   "o/ 지금(시간)/(시각)이  b/ 얼마나 됐지"
//     → "지금시각이 얼마나 됐지"
//
// Every pass is a pure &str → String function; the whole pipeline
// is idempotent because pass 2 leaves no '/', '*' or '+' behind.

/// Separator between the spelled and the pronounced group.
const DUAL_MARKER: &str = ")/(";

/// Annotation tags, removed in this order.
const DETAILS: [&str; 8] = ["b/", "l/", "o/", "n/", "*", "u/", "/", "+"];

/// Run all normalisation passes over a raw transcript.
pub fn refine_ksponspeech(text: &str) -> String {
    let text = remove_double_script(text);
    let text = remove_details(&text);
    let text = remove_double_space(&text);
    text.trim().to_string()
}

/// Replace every `(spelled)/(pronounced)` pair with `pronounced`.
///
/// Expects well-formed pairs. Malformed input never panics: with no
/// `(` before the marker the left side is kept whole, with no `)` after
/// it the right side is kept whole.
pub fn remove_double_script(text: &str) -> String {
    let mut text = text.to_string();

    // Each pass drops the marker itself, so the string strictly shrinks.
    while let Some(index) = text.find(DUAL_MARKER) {
        let left  = &text[..index];
        let right = &text[index + DUAL_MARKER.len()..];

        // Nearest '(' before the marker opens the spelled group
        let left = match left.rfind('(') {
            Some(open) => &left[..open],
            None       => left,
        };

        let mut joined = String::with_capacity(text.len());
        joined.push_str(left);

        // First ')' after the marker closes the pronounced group
        match right.find(')') {
            Some(close) => {
                joined.push_str(&right[..close]);
                joined.push_str(&right[close + 1..]);
            }
            None => joined.push_str(right),
        }

        text = joined;
    }

    text
}

/// Remove every annotation tag.
pub fn remove_details(text: &str) -> String {
    DETAILS
        .iter()
        .fold(text.to_string(), |acc, tag| acc.replace(tag, ""))
}

/// Collapse any run of literal spaces to one. Tabs and newlines are
/// left alone.
pub fn remove_double_space(text: &str) -> String {
    let mut text = text.to_string();
    while text.contains("  ") {
        text = text.replace("  ", " ");
    }
    text
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dual_transcription_keeps_pronounced_form() {
        assert_eq!(
            refine_ksponspeech("지금(시간)/(시각)이 얼마나 됐지"),
            "지금시각이 얼마나 됐지"
        );
    }

    #[test]
    fn test_breath_marker_stripped() {
        assert_eq!(
            refine_ksponspeech("그래서 나는 b/ 학교에 갔다"),
            "그래서 나는 학교에 갔다"
        );
    }

    #[test]
    fn test_multi_space_runs_collapse() {
        assert_eq!(
            refine_ksponspeech("아  침에   학교에 갔다"),
            "아 침에 학교에 갔다"
        );
    }

    #[test]
    fn test_repetition_marker_stripped() {
        assert_eq!(
            refine_ksponspeech("아침에 학교+ 학교에 갔다"),
            "아침에 학교 학교에 갔다"
        );
    }

    #[test]
    fn test_all_noise_tags() {
        assert_eq!(
            refine_ksponspeech("o/ l/ 응 n/ 그래* u/ 음/ 맞아"),
            "응 그래 음 맞아"
        );
    }

    #[test]
    fn test_two_dual_transcriptions() {
        assert_eq!(
            remove_double_script("(3)/(삼) 시에 (10)/(십) 분"),
            "삼 시에 십 분"
        );
    }

    #[test]
    fn test_nearest_open_paren_is_used() {
        // An unrelated parenthesis earlier in the line is not consumed
        assert_eq!(
            remove_double_script("(웃음) 지금(시간)/(시각)"),
            "(웃음) 지금시각"
        );
    }

    #[test]
    fn test_malformed_pair_does_not_panic() {
        assert_eq!(remove_double_script("시간)/(시각"), "시간시각");
        assert_eq!(remove_double_script(")/()/("), "/(");
    }

    #[test]
    fn test_tabs_are_not_collapsed() {
        assert_eq!(remove_double_space("a\t\tb  c"), "a\t\tb c");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(refine_ksponspeech("  b/ 네  \n"), "네");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(refine_ksponspeech(""), "");
    }

    proptest! {
        #[test]
        fn prop_refine_is_idempotent(text in "\\PC{0,60}") {
            let once = refine_ksponspeech(&text);
            prop_assert_eq!(refine_ksponspeech(&once), once);
        }

        #[test]
        fn prop_refine_is_idempotent_on_markup(text in "[가-힣a-z ()/*+bln]{0,60}") {
            let once = refine_ksponspeech(&text);
            prop_assert_eq!(refine_ksponspeech(&once), once.clone());
            prop_assert!(!once.contains("  "));
            prop_assert!(!once.contains('/'));
        }
    }
}
