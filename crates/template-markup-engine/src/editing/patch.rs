use std::ops::Range;

use super::transaction::Mapping;

/// Result of applying a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Regions of the new document written by the transaction.
    pub changed: Vec<Range<usize>>,
    pub new_selection: Range<usize>,
    pub version: u64,
    pub doc_changed: bool,
    /// Maps positions from the old document into the new one.
    pub mapping: Mapping,
}
