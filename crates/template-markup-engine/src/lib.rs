//! Parsing, serialization and editing core for conditional template markup.
//!
//! Templates mix variables `((name))`, conditionals `((cond??content))` (inline
//! or spanning blocks) and language sections `[[en]] .. [[/en]]` with a small
//! markdown subset. The core turns markup into a document tree, edits that
//! tree through validated transactions, and writes it back byte-stable.

pub mod editing;
pub mod io;
pub mod model;
pub mod navigation;
pub mod options;
pub mod parsing;
pub mod render;
pub mod serialize;

pub use editing::{Cmd, EditError, Editor, EditorState, Transaction};
pub use io::{IoError, TemplateFile, read_template, scan_templates, write_template};
pub use model::{Block, DEFAULT_CONDITION, Document, Language, Mark, TextRun};
pub use options::MarkupOptions;
pub use parsing::{ParseContext, parse_blocks, parse_markup};
pub use render::to_html;
pub use serialize::{serialize, serialize_with};
