//! Balanced `((` / `))` scanning.
//!
//! Conditional content may itself contain variables or other parenthesised
//! markup, so the closing `))` of a conditional is the first one at nesting
//! depth zero. Depth carries across lines for block conditionals.

use super::inline::cursor::Cursor;

pub const OPEN: &[u8; 2] = b"((";
pub const CLOSE: &[u8; 2] = b"))";

/// Outcome of scanning one chunk of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerScan<'a> {
    /// Text before the terminator, or the whole chunk when none was found.
    pub content: &'a str,
    /// Byte offset of the terminating `))`.
    pub close: Option<usize>,
    /// Nesting depth left open at the end of the chunk.
    pub depth: usize,
}

impl MarkerScan<'_> {
    pub fn found(&self) -> bool {
        self.close.is_some()
    }
}

/// Scans `text` for the `))` that closes a construct, starting at nesting `depth`.
///
/// Each `((` opens a level and each `))` closes one. A `))` at depth zero
/// terminates unless a third `)` follows; in `)))` the first `)` belongs to the
/// content.
pub fn scan_markers(text: &str, depth: usize) -> MarkerScan<'_> {
    let mut cur = Cursor::new(text);
    let mut depth = depth;
    while !cur.eof() {
        if cur.starts_with(OPEN) {
            depth += 1;
            cur.bump_n(OPEN.len());
            continue;
        }
        if cur.starts_with(CLOSE) {
            if depth > 0 {
                depth -= 1;
                cur.bump_n(CLOSE.len());
                continue;
            }
            if cur.peek_at(CLOSE.len()) == Some(b')') {
                cur.bump();
                continue;
            }
            return MarkerScan {
                content: &text[..cur.i],
                close: Some(cur.i),
                depth: 0,
            };
        }
        cur.bump();
    }
    MarkerScan {
        content: text,
        close: None,
        depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain))", Some(5), "plain")]
    #[case("Hi ((name)) there)) tail", Some(17), "Hi ((name)) there")]
    #[case("f(x)))", Some(4), "f(x)")]
    #[case("no close", None, "no close")]
    #[case("((a)) ((b))", None, "((a)) ((b))")]
    fn finds_depth_zero_terminator(
        #[case] text: &str,
        #[case] close: Option<usize>,
        #[case] content: &str,
    ) {
        let scan = scan_markers(text, 0);
        assert_eq!(scan.close, close);
        assert_eq!(scan.content, content);
    }

    #[test]
    fn depth_carries_across_chunks() {
        let first = scan_markers("opens ((here", 0);
        assert_eq!(first.depth, 1);
        assert!(!first.found());
        let second = scan_markers("closes)) then))", first.depth);
        assert_eq!(second.close, Some(13));
        assert_eq!(second.content, "closes)) then");
    }

    #[test]
    fn empty_chunk_keeps_depth() {
        assert_eq!(scan_markers("", 2).depth, 2);
    }
}
