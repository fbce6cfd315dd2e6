use serde::{Deserialize, Serialize};

use super::text::{TextRun, inline_len};

/// Condition substituted when stored content carries none.
pub const DEFAULT_CONDITION: &str = "condition";

pub(crate) fn default_condition() -> String {
    DEFAULT_CONDITION.to_string()
}

fn default_start() -> u64 {
    1
}

/// Languages a template section can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
        }
    }

    /// Parses a language code case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }
}

/// A block-level node of the document tree.
///
/// Containers hold child blocks, text blocks hold [`TextRun`]s. Lists hold only
/// [`Block::ListItem`] children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        content: Vec<TextRun>,
    },
    Heading {
        level: u8,
        #[serde(default)]
        content: Vec<TextRun>,
    },
    BulletList {
        content: Vec<Block>,
    },
    OrderedList {
        #[serde(default = "default_start")]
        start: u64,
        content: Vec<Block>,
    },
    ListItem {
        content: Vec<Block>,
    },
    Blockquote {
        content: Vec<Block>,
    },
    HorizontalRule,
    ConditionalBlock {
        #[serde(default = "default_condition")]
        condition: String,
        content: Vec<Block>,
    },
    LanguageBlock {
        language: Language,
        content: Vec<Block>,
    },
}

impl Block {
    pub fn paragraph(content: Vec<TextRun>) -> Self {
        Block::Paragraph { content }
    }

    pub fn empty_paragraph() -> Self {
        Block::Paragraph { content: vec![] }
    }

    pub fn conditional(condition: impl Into<String>, content: Vec<Block>) -> Self {
        Block::ConditionalBlock {
            condition: condition.into(),
            content,
        }
    }

    pub fn language(language: Language, content: Vec<Block>) -> Self {
        Block::LanguageBlock { language, content }
    }

    /// Node name used in diagnostics and `data-type` attributes.
    pub fn type_name(&self) -> &'static str {
        match self {
            Block::Paragraph { .. } => "paragraph",
            Block::Heading { .. } => "heading",
            Block::BulletList { .. } => "bulletList",
            Block::OrderedList { .. } => "orderedList",
            Block::ListItem { .. } => "listItem",
            Block::Blockquote { .. } => "blockquote",
            Block::HorizontalRule => "horizontalRule",
            Block::ConditionalBlock { .. } => "conditionalBlock",
            Block::LanguageBlock { .. } => "languageBlock",
        }
    }

    pub fn is_textblock(&self) -> bool {
        matches!(self, Block::Paragraph { .. } | Block::Heading { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Block::BulletList { .. } | Block::OrderedList { .. })
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Block::ConditionalBlock { .. })
    }

    pub fn is_language(&self) -> bool {
        matches!(self, Block::LanguageBlock { .. })
    }

    pub fn inline_content(&self) -> Option<&[TextRun]> {
        match self {
            Block::Paragraph { content } | Block::Heading { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn inline_content_mut(&mut self) -> Option<&mut Vec<TextRun>> {
        match self {
            Block::Paragraph { content } | Block::Heading { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[Block]> {
        match self {
            Block::BulletList { content }
            | Block::OrderedList { content, .. }
            | Block::ListItem { content }
            | Block::Blockquote { content }
            | Block::ConditionalBlock { content, .. }
            | Block::LanguageBlock { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::BulletList { content }
            | Block::OrderedList { content, .. }
            | Block::ListItem { content }
            | Block::Blockquote { content }
            | Block::ConditionalBlock { content, .. }
            | Block::LanguageBlock { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Same kind of text block carrying different inline content.
    pub fn with_inline(&self, content: Vec<TextRun>) -> Block {
        match self {
            Block::Heading { level, .. } => Block::Heading {
                level: *level,
                content,
            },
            _ => Block::Paragraph { content },
        }
    }

    /// Number of positions this node occupies in its parent.
    pub fn node_size(&self) -> usize {
        if let Some(runs) = self.inline_content() {
            return 2 + inline_len(runs);
        }
        match self.children() {
            Some(children) => 2 + content_size(children),
            None => 1,
        }
    }

    /// True when the subtree holds any block matching `pred`, including `self`.
    pub fn contains_block(&self, pred: &impl Fn(&Block) -> bool) -> bool {
        pred(self)
            || self
                .children()
                .is_some_and(|c| c.iter().any(|b| b.contains_block(pred)))
    }

    /// True when any text run in the subtree matches `pred`.
    pub fn contains_run(&self, pred: &impl Fn(&TextRun) -> bool) -> bool {
        if let Some(runs) = self.inline_content() {
            return runs.iter().any(pred);
        }
        self.children()
            .is_some_and(|c| c.iter().any(|b| b.contains_run(pred)))
    }
}

/// Combined size of a sequence of sibling nodes.
pub fn content_size(blocks: &[Block]) -> usize {
    blocks.iter().map(Block::node_size).sum()
}

/// The root of a template: a non-empty sequence of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: Vec<Block>,
}

impl Document {
    pub fn new(content: Vec<Block>) -> Self {
        if content.is_empty() {
            return Self::empty();
        }
        Self { content }
    }

    /// A document holding one empty paragraph.
    pub fn empty() -> Self {
        Self {
            content: vec![Block::empty_paragraph()],
        }
    }

    /// Loads the JSON tree form used by storage.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        Ok(Document::new(doc.content))
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Highest valid position in the document.
    pub fn content_size(&self) -> usize {
        content_size(&self.content)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mark;
    use pretty_assertions::assert_eq;

    #[test]
    fn node_sizes() {
        let para = Block::paragraph(vec![TextRun::plain("abc")]);
        assert_eq!(para.node_size(), 5);
        assert_eq!(Block::HorizontalRule.node_size(), 1);
        let cond = Block::conditional("x", vec![para.clone(), Block::empty_paragraph()]);
        assert_eq!(cond.node_size(), 2 + 5 + 2);
    }

    #[test]
    fn language_codes_parse_case_insensitively() {
        assert_eq!(Language::from_code("EN"), Some(Language::En));
        assert_eq!(Language::from_code("fr"), Some(Language::Fr));
        assert_eq!(Language::from_code("de"), None);
    }

    #[test]
    fn legacy_conditional_block_gets_default_condition() {
        let doc = Document::from_json(
            r#"{"content":[{"type":"conditionalBlock","content":[{"type":"paragraph"}]}]}"#,
        )
        .unwrap();
        assert_eq!(
            doc.content[0],
            Block::conditional(DEFAULT_CONDITION, vec![Block::empty_paragraph()])
        );
    }

    #[test]
    fn json_tree_round_trip() {
        let doc = Document::new(vec![Block::paragraph(vec![
            TextRun::plain("Hi "),
            TextRun::new("name", vec![Mark::Variable]),
        ])]);
        let json = doc.to_json().unwrap();
        assert!(json.contains(r#""type": "variable""#));
        assert_eq!(Document::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn empty_json_content_becomes_empty_paragraph() {
        let doc = Document::from_json(r#"{"content":[]}"#).unwrap();
        assert_eq!(doc, Document::empty());
    }
}
