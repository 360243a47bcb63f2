//! Text fingerprinting
//!
//! A cheap, non-cryptographic key that lets the UI layer tell two selected
//! texts apart (cached drafts, user edits). It has no role in classification.

/// Number of UTF-16 units of the trimmed text folded into the rolling hash.
const HASH_PREFIX_UNITS: usize = 200;

/// Number of UTF-16 units sampled from each end of the text.
const EDGE_UNITS: usize = 5;

/// Compute the fingerprint of `text`.
///
/// The key has the shape `"{hash}_{len}_{edges}"`: a 32-bit polynomial hash of
/// the trimmed prefix, the UTF-16 length modulo 1000, and the alphanumeric or
/// CJK characters among the first and last five units. Empty text maps to `"0"`.
pub fn fingerprint(text: &str) -> String {
    if text.is_empty() {
        return "0".to_string();
    }

    let hash = text
        .trim()
        .encode_utf16()
        .take(HASH_PREFIX_UNITS)
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));

    let units: Vec<u16> = text.encode_utf16().collect();
    let length_hash = units.len() % 1000;

    let head = edge_chars(&units[..units.len().min(EDGE_UNITS)]);
    let tail = edge_chars(&units[units.len().saturating_sub(EDGE_UNITS)..]);

    format!("{hash}_{length_hash}_{head}{tail}")
}

fn edge_chars(units: &[u16]) -> String {
    let kept: Vec<u16> = units
        .iter()
        .copied()
        .filter(|&u| is_key_unit(u))
        .collect();
    String::from_utf16_lossy(&kept)
}

fn is_key_unit(unit: u16) -> bool {
    matches!(unit, 0x30..=0x39 | 0x41..=0x5A | 0x61..=0x7A | 0x4E00..=0x9FA5)
}
