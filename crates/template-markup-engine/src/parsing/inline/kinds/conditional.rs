/// Inline conditional `((condition??content))`.
pub struct Conditional;

impl Conditional {
    pub const OPEN: &'static [u8; 2] = b"((";
    pub const SEPARATOR: &'static str = "??";
    pub const CLOSE: &'static [u8; 2] = b"))";
    /// Shortest text that can hold a complete conditional, e.g. `((a??b))`.
    pub const MIN_LEN: usize = 8;

    /// Splits a `((condition??` header off the front of `s`.
    ///
    /// Returns the raw condition and the byte offset just past `??`. The
    /// condition must be non-blank and free of `?`, parentheses and newlines.
    pub fn split_header(s: &str) -> Option<(&str, usize)> {
        let body = s.strip_prefix("((")?;
        let sep = body.find(Self::SEPARATOR)?;
        let condition = &body[..sep];
        if !Self::is_valid_condition(condition) {
            return None;
        }
        Some((condition, Self::OPEN.len() + sep + Self::SEPARATOR.len()))
    }

    pub fn is_valid_condition(condition: &str) -> bool {
        !condition.trim().is_empty()
            && !condition.contains(['?', '(', ')', '\n'])
    }

    /// Inline content must stay on one line and hold something besides spaces.
    pub fn is_valid_content(content: &str) -> bool {
        !content.trim().is_empty() && !content.contains('\n')
    }
}
