use xi_rope::Rope;

use super::span::Span;

/// A single line of the source rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line in the rope, newline included.
    pub span: Span,
    pub text: String,
}

/// Iterates the rope's lines with their byte spans.
///
/// `lines_raw` keeps terminators so spans tile the rope exactly; callers strip
/// `\r\n` themselves.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        offset += line.len();
        LineRef {
            span: Span::new(start, offset),
            text: line.into_owned(),
        }
    })
}
