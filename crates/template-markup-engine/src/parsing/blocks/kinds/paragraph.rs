/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters. They are the default text block when no
/// opener matches; their lines are trimmed and joined with `\n` before
/// inline parsing.
pub struct Paragraph;

impl Paragraph {
    pub fn join_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
        lines
            .into_iter()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
