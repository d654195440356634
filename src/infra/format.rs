// ============================================================
// Layer 6 — Human-readable sizes
// ============================================================
// Used by `inspect` to report how much audio a corpus holds.
//
// Binary prefixes, one decimal:
//   1536           → "1.5KiB"
//   3 * 1024²      → "3.0MiB"
//   u64::MAX       → "16.0EiB"
//
// Each step divides by 1024; the first unit under 1024 wins.

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Format a byte count with binary prefixes, e.g. `"1.5KiB"`.
/// The number is padded to a minimum width of three characters.
pub fn human_size(bytes: u64) -> String {
    let mut num = bytes as f64;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{num:3.1}{unit}B");
        }
        num /= 1024.0;
    }
    // unreachable for u64 input
    format!("{num:.1}YiB")
}
