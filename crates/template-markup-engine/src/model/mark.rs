use serde::{Deserialize, Serialize};

use super::node::default_condition;

/// An attributed overlay on a run of inline text.
///
/// At most one mark of each [`MarkKind`] applies to a run. Mark lists are kept
/// sorted by kind so that two runs with the same marks compare equal, and so
/// the serializer can open outer marks before inner ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    /// `((condition??content))` - content only shown when `condition` holds.
    ConditionalInline {
        #[serde(default = "default_condition")]
        condition: String,
    },
    /// `[text](href)`
    Link { href: String },
    /// `**text**`
    Bold,
    /// `_text_`
    Italic,
    /// `((name))` - placeholder substituted at send time.
    Variable,
}

/// Mark discriminant. Declaration order is nesting order: earlier kinds wrap later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkKind {
    ConditionalInline,
    Link,
    Bold,
    Italic,
    Variable,
}

impl Mark {
    pub fn conditional(condition: impl Into<String>) -> Self {
        Mark::ConditionalInline {
            condition: condition.into(),
        }
    }

    pub fn kind(&self) -> MarkKind {
        match self {
            Mark::ConditionalInline { .. } => MarkKind::ConditionalInline,
            Mark::Link { .. } => MarkKind::Link,
            Mark::Bold => MarkKind::Bold,
            Mark::Italic => MarkKind::Italic,
            Mark::Variable => MarkKind::Variable,
        }
    }

    /// Condition of a conditional-inline mark.
    pub fn condition(&self) -> Option<&str> {
        match self {
            Mark::ConditionalInline { condition } => Some(condition),
            _ => None,
        }
    }

    /// Spanning marks merge across adjacent runs. Variables never do: `((a))((b))`
    /// stays two placeholders.
    pub fn is_spanning(&self) -> bool {
        !matches!(self, Mark::Variable)
    }

    /// Inclusive marks extend to text typed at their end.
    pub fn is_inclusive(&self) -> bool {
        !matches!(self, Mark::Variable | Mark::Link { .. })
    }
}

/// Adds `mark` to a sorted mark list, replacing any mark of the same kind.
pub fn add_mark(marks: &mut Vec<Mark>, mark: Mark) {
    marks.retain(|m| m.kind() != mark.kind());
    marks.push(mark);
    marks.sort_by_key(Mark::kind);
}

/// Removes every mark of `kind`.
pub fn remove_mark(marks: &mut Vec<Mark>, kind: MarkKind) {
    marks.retain(|m| m.kind() != kind);
}

/// Returns a copy of `marks` with `mark` added.
pub fn with_mark(marks: &[Mark], mark: Mark) -> Vec<Mark> {
    let mut out = marks.to_vec();
    add_mark(&mut out, mark);
    out
}

/// Returns a copy of `marks` without marks of `kind`.
pub fn without_kind(marks: &[Mark], kind: MarkKind) -> Vec<Mark> {
    marks.iter().filter(|m| m.kind() != kind).cloned().collect()
}

pub fn has_kind(marks: &[Mark], kind: MarkKind) -> bool {
    marks.iter().any(|m| m.kind() == kind)
}
