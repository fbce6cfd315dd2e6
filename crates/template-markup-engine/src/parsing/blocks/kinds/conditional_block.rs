use crate::parsing::inline::kinds::Conditional;

/// Multi-line conditional:
///
/// ```text
/// ((condition??
/// body
/// ))
/// ```
pub struct ConditionalBlock;

impl ConditionalBlock {
    pub const OPEN_SUFFIX: &'static str = "??";
    pub const CLOSE: &'static str = "))";

    /// Returns the condition and the byte offset of the opener's trailing text.
    pub fn opener(s: &str) -> Option<(&str, usize)> {
        Conditional::split_header(s)
    }
}
