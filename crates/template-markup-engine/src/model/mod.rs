//! Tree representation of a template: blocks, inline runs, marks and positions.

pub mod invariants;
pub mod mark;
pub mod node;
pub mod position;
pub mod text;

pub use invariants::{InvariantViolation, check};
pub use mark::{Mark, MarkKind};
pub use node::{Block, DEFAULT_CONDITION, Document, Language, content_size};
pub use position::{BlockRange, ResolvedPos, TextblockPos, resolve, textblock_at, textblocks};
pub use text::{TextRun, inline_len, plain_text};
