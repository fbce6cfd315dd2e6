//! # Inline Parsing
//!
//! Cursor-based parsing of a single text block's content into [`TextRun`]s.
//!
//! ## Modules
//!
//! - **`kinds`**: Inline constructs with owned delimiters (Conditional, Variable, Bold, Italic, Link)
//! - **`cursor`**: `Cursor` for byte-by-byte parsing
//! - **`parser`**: `parse_inline()` main entry point with `try_parse_*` helpers
//!
//! ## Precedence
//!
//! Inline conditionals are tried before variables. Inside conditional content
//! (and anywhere inside a conditional block) conditionals are not recognised.
//!
//! [`TextRun`]: crate::model::TextRun

pub mod cursor;
pub mod kinds;
pub mod parser;

pub use parser::parse_inline;
