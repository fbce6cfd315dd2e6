//! Lines as seen by the block parser, after container prefixes are stripped.

use crate::parsing::rope::{lines::LineRef, span::Span};

/// One physical line's content within its innermost container.
///
/// Quote markers and list indentation are stripped as the parser descends,
/// while `content` keeps pointing at the remaining bytes of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Source span of `text`.
    pub content: Span,
    pub text: String,
}

impl ContentLine {
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        Self {
            content: Span {
                start,
                end: start + text.len(),
            },
            text,
        }
    }

    /// A rope line with its line terminator removed.
    pub fn from_line_ref(lr: &LineRef) -> Self {
        Self::new(lr.text.trim_end_matches(['\r', '\n']), lr.span.start)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Leading indentation in columns; a tab counts as four.
    pub fn indent(&self) -> usize {
        let mut cols = 0;
        for c in self.text.chars() {
            match c {
                ' ' => cols += 1,
                '\t' => cols += 4,
                _ => break,
            }
        }
        cols
    }

    /// Drops the first `n` bytes.
    pub fn skip(&self, n: usize) -> Self {
        let n = n.min(self.text.len());
        Self::new(&self.text[n..], self.content.start + n)
    }

    /// Removes up to `cols` columns of leading indentation.
    pub fn dedent(&self, cols: usize) -> Self {
        let mut seen = 0;
        let mut cut = 0;
        for c in self.text.chars() {
            if seen >= cols {
                break;
            }
            match c {
                ' ' => seen += 1,
                '\t' => seen += 4,
                _ => break,
            }
            cut += 1;
        }
        self.skip(cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_follow_stripping() {
        let line = ContentLine::new("^ quoted", 10);
        let inner = line.skip(2);
        assert_eq!(inner.text, "quoted");
        assert_eq!(inner.content, Span { start: 12, end: 18 });
    }

    #[test]
    fn dedent_stops_at_text() {
        let line = ContentLine::new("  x", 0);
        assert_eq!(line.indent(), 2);
        assert_eq!(line.dedent(4).text, "x");
        assert_eq!(ContentLine::new("\tx", 0).indent(), 4);
    }
}
