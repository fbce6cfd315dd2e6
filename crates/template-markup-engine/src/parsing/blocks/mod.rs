//! # Block Parsing
//!
//! Two-phase, line-based block parsing.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding local facts (blank, indentation, candidate opener)
//! 2. **Block Construction** (`builder`): a `BlockBuilder` accumulates
//!    paragraphs and collects container lines, recursing for their content
//!
//! ## Modules
//!
//! - **`content`**: `ContentLine`, a line with container prefixes stripped
//! - **`kinds`**: Block types with owned delimiters
//! - **`open`**: `try_open` dispatch for detecting block openers
//! - **`classify`**: `TemplateLineClassifier` produces `LineClass` for each line
//! - **`builder`**: `BlockBuilder` state machine for block construction
//!
//! ## Key Invariants
//!
//! - Conditional blocks never nest and never hold inline conditionals
//! - Language blocks never nest
//! - Every container holds at least one block

pub mod builder;
pub mod classify;
pub mod content;
pub mod kinds;
pub mod open;

pub use builder::BlockBuilder;
pub use classify::{LineClass, TemplateLineClassifier};
pub use content::ContentLine;
