use crate::model::Language;
use crate::parsing::ParseContext;

use super::kinds::{BlockQuote, ConditionalBlock, Heading, LanguageBlock, ListMarker, ThematicBreak};

/// A block opener recognised on a single line.
///
/// Multi-line openers (conditional and language blocks) are only candidates:
/// the builder still has to find their terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpen {
    Conditional { condition: String, body_at: usize },
    Language { language: Language, body_at: usize },
    Rule,
    Heading { level: u8 },
    Quote,
    ListItem { marker: ListMarker, width: usize },
}

/// Detects an opener at the start of `text` (leading indentation already removed).
pub fn try_open(text: &str, ctx: ParseContext) -> Option<BlockOpen> {
    // Precedence: template constructs first, then rule before list so `---` and
    // `***` are rules rather than bullets.
    if ctx.allow_conditional
        && let Some((condition, body_at)) = ConditionalBlock::opener(text)
    {
        return Some(BlockOpen::Conditional {
            condition: condition.trim().to_string(),
            body_at,
        });
    }
    if ctx.allow_language_block
        && let Some((language, body_at)) = LanguageBlock::opener(text)
    {
        return Some(BlockOpen::Language { language, body_at });
    }
    if ThematicBreak::is_rule(text) {
        return Some(BlockOpen::Rule);
    }
    if let Some((level, _)) = Heading::parse(text) {
        return Some(BlockOpen::Heading { level });
    }
    if BlockQuote::content_offset(text).is_some() {
        return Some(BlockOpen::Quote);
    }
    if let Some((marker, width)) = ListMarker::parse(text) {
        return Some(BlockOpen::ListItem { marker, width });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_beats_bullet() {
        assert_eq!(try_open("***", ParseContext::default()), Some(BlockOpen::Rule));
        assert!(matches!(
            try_open("* x", ParseContext::default()),
            Some(BlockOpen::ListItem { .. })
        ));
    }

    #[test]
    fn context_disables_template_openers() {
        let ctx = ParseContext::default().inside_conditional().inside_language_block();
        assert_eq!(try_open("((a??", ctx), None);
        assert_eq!(try_open("[[en]]", ctx), None);
    }
}
