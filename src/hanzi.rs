//! Input text handling: pick out practisable characters.
//!
//! Only characters from the CJK Unified Ideographs block (U+4E00..=U+9FA5)
//! become worksheet rows. Everything else (Latin letters, punctuation,
//! whitespace, kana) is dropped before deduplication.

/// Whether `c` is a character that gets its own worksheet row.
#[inline]
pub fn is_practice_char(c: char) -> bool {
    ('\u{4E00}'..='\u{9FA5}').contains(&c)
}

/// Keep only practisable characters, preserving order and repeats.
///
/// ```
/// assert_eq!(hanzi_sheet::hanzi::filter_characters("aa好好bb"), vec!['好', '好']);
/// ```
pub fn filter_characters(input: &str) -> Vec<char> {
    input.chars().filter(|&c| is_practice_char(c)).collect()
}

/// Filter, then collapse repeats to their first occurrence.
///
/// ```
/// use hanzi_sheet::hanzi::unique_characters;
///
/// assert_eq!(unique_characters("学而时习之，学习"), vec!['学', '而', '时', '习', '之']);
/// ```
pub fn unique_characters(input: &str) -> Vec<char> {
    let mut seen = Vec::new();
    for c in filter_characters(input) {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}
