use crate::parsing::ParseContext;

use super::{
    content::ContentLine,
    open::{BlockOpen, try_open},
};

/// Classification of a single line containing only local facts.
///
/// Phase 1 of block parsing: each line is classified on its own; the builder
/// decides what the opener turns into once it can look at following lines.
#[derive(Debug, Clone)]
pub struct LineClass {
    pub is_blank: bool,
    /// Columns of leading indentation.
    pub indent: usize,
    pub open: Option<BlockOpen>,
}

/// Classifies lines for the block builder under a parse context.
pub struct TemplateLineClassifier {
    pub ctx: ParseContext,
}

impl TemplateLineClassifier {
    pub fn classify(&self, line: &ContentLine) -> LineClass {
        let is_blank = line.is_blank();
        LineClass {
            is_blank,
            indent: line.indent(),
            open: if is_blank {
                None
            } else {
                try_open(line.text.trim_start(), self.ctx)
            },
        }
    }
}
