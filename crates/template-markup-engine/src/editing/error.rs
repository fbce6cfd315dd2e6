use std::ops::Range;

use thiserror::Error;

use crate::model::InvariantViolation;

/// Why a transaction was rejected. A rejected transaction leaves the state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("position {0} is outside the document")]
    OutOfBounds(usize),

    #[error("position {0} is not inside a text block")]
    NotInTextblock(usize),

    #[error("text range {from}..{to} crosses text block boundaries")]
    CrossesTextblocks { from: usize, to: usize },

    #[error("no container at path {0:?}")]
    InvalidPath(Vec<usize>),

    #[error("child range {range:?} is invalid for container at {path:?}")]
    InvalidChildRange { path: Vec<usize>, range: Range<usize> },

    #[error("block at {0:?} does not take these attributes")]
    AttrMismatch(Vec<usize>),

    #[error("edit would break the document structure: {0}")]
    Invariant(#[from] InvariantViolation),
}
