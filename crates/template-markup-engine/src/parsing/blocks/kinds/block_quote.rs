/// Blockquote with owned prefix characters.
///
/// Storage writes `^ `; `> ` is read as well.
pub struct BlockQuote;

impl BlockQuote {
    pub const PREFIXES: [char; 2] = ['^', '>'];
    pub const STORAGE_PREFIX: char = '^';

    /// Byte offset where quoted content starts, if `s` opens with a quote marker.
    ///
    /// One space after the marker belongs to the prefix.
    pub fn content_offset(s: &str) -> Option<usize> {
        let first = s.chars().next()?;
        if !Self::PREFIXES.contains(&first) {
            return None;
        }
        Some(if s[1..].starts_with(' ') { 2 } else { 1 })
    }
}
