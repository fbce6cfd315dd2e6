//! Structural rules every committed document satisfies.

use super::mark::MarkKind;
use super::node::{Block, Document};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("document has no blocks")]
    EmptyDocument,
    #[error("{kind} at {path:?} has no content")]
    EmptyContainer { kind: &'static str, path: Vec<usize> },
    #[error("conditional block nested inside another at {path:?}")]
    NestedConditional { path: Vec<usize> },
    #[error("inline conditional inside a conditional block at {path:?}")]
    InlineConditionalInBlock { path: Vec<usize> },
    #[error("language block nested inside another at {path:?}")]
    NestedLanguage { path: Vec<usize> },
    #[error("list at {path:?} holds a {found} child")]
    ListChild { path: Vec<usize>, found: &'static str },
    #[error("list item outside a list at {path:?}")]
    StrayListItem { path: Vec<usize> },
    #[error("heading level {level} at {path:?} is out of range")]
    HeadingLevel { level: u8, path: Vec<usize> },
    #[error("empty condition at {path:?}")]
    EmptyCondition { path: Vec<usize> },
}

#[derive(Default, Clone, Copy)]
struct Scope {
    in_conditional: bool,
    in_language: bool,
    in_list: bool,
}

/// Checks the whole tree, reporting the first violation found.
pub fn check(doc: &Document) -> Result<(), InvariantViolation> {
    if doc.content.is_empty() {
        return Err(InvariantViolation::EmptyDocument);
    }
    check_blocks(&doc.content, Scope::default(), &mut vec![])
}

fn check_blocks(
    blocks: &[Block],
    scope: Scope,
    path: &mut Vec<usize>,
) -> Result<(), InvariantViolation> {
    for (i, block) in blocks.iter().enumerate() {
        path.push(i);
        check_block(block, scope, path)?;
        path.pop();
    }
    Ok(())
}

fn check_block(
    block: &Block,
    scope: Scope,
    path: &mut Vec<usize>,
) -> Result<(), InvariantViolation> {
    let here = || path.clone();

    if scope.in_list != matches!(block, Block::ListItem { .. }) {
        return Err(if scope.in_list {
            InvariantViolation::ListChild {
                path: here(),
                found: block.type_name(),
            }
        } else {
            InvariantViolation::StrayListItem { path: here() }
        });
    }

    let mut inner = Scope {
        in_list: block.is_list(),
        ..scope
    };
    match block {
        Block::Heading { level, .. } if !(1..=6).contains(level) => {
            return Err(InvariantViolation::HeadingLevel {
                level: *level,
                path: here(),
            });
        }
        Block::ConditionalBlock { condition, .. } => {
            if scope.in_conditional {
                return Err(InvariantViolation::NestedConditional { path: here() });
            }
            if condition.trim().is_empty() {
                return Err(InvariantViolation::EmptyCondition { path: here() });
            }
            inner.in_conditional = true;
        }
        Block::LanguageBlock { .. } => {
            if scope.in_language {
                return Err(InvariantViolation::NestedLanguage { path: here() });
            }
            inner.in_language = true;
        }
        _ => {}
    }

    if let Some(runs) = block.inline_content() {
        for run in runs {
            for mark in &run.marks {
                if mark.kind() != MarkKind::ConditionalInline {
                    continue;
                }
                if scope.in_conditional {
                    return Err(InvariantViolation::InlineConditionalInBlock { path: here() });
                }
                if mark.condition().is_some_and(|c| c.trim().is_empty()) {
                    return Err(InvariantViolation::EmptyCondition { path: here() });
                }
            }
        }
    }

    if let Some(children) = block.children() {
        if children.is_empty() {
            return Err(InvariantViolation::EmptyContainer {
                kind: block.type_name(),
                path: here(),
            });
        }
        check_blocks(children, inner, path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mark, TextRun};

    fn para(text: &str) -> Block {
        Block::paragraph(vec![TextRun::plain(text)])
    }

    #[test]
    fn accepts_language_inside_conditional() {
        let doc = Document::new(vec![Block::conditional(
            "x",
            vec![Block::language(crate::model::Language::En, vec![para("hi")])],
        )]);
        assert_eq!(check(&doc), Ok(()));
    }

    #[test]
    fn rejects_nested_conditional_blocks() {
        let doc = Document::new(vec![Block::conditional(
            "a",
            vec![Block::conditional("b", vec![para("x")])],
        )]);
        assert_eq!(
            check(&doc),
            Err(InvariantViolation::NestedConditional { path: vec![0, 0] })
        );
    }

    #[test]
    fn rejects_inline_conditional_in_block() {
        let doc = Document::new(vec![Block::conditional(
            "a",
            vec![Block::paragraph(vec![TextRun::new(
                "x",
                vec![Mark::conditional("b")],
            )])],
        )]);
        assert!(matches!(
            check(&doc),
            Err(InvariantViolation::InlineConditionalInBlock { .. })
        ));
    }

    #[test]
    fn rejects_empty_containers_and_bad_list_children() {
        let doc = Document::new(vec![Block::conditional("a", vec![])]);
        assert!(matches!(
            check(&doc),
            Err(InvariantViolation::EmptyContainer { .. })
        ));
        let doc = Document::new(vec![Block::BulletList {
            content: vec![para("x")],
        }]);
        assert!(matches!(check(&doc), Err(InvariantViolation::ListChild { .. })));
    }
}
