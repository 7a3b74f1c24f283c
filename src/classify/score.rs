//! Parsing of the raw `Total score` cell.
//!
//! Survey exports write the score followed by free text, e.g. `"27 (Moderate)"`
//! or `"27 pts"`. The score is the leading run of ASCII digits:
//!
//! - parsing stops at the first non-digit character, including leading whitespace
//!   (CSV ingest already trims cells)
//! - no leading digits at all means a score of 0
//! - runs too long for `i64` saturate, which no range contains, so they end up
//!   unclassified instead of being truncated to a valid-looking score

/// Parse the leading digit run of a raw score cell.
pub fn parse_score(raw: &str) -> i64 {
    raw.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add(i64::from(b - b'0')))
}
