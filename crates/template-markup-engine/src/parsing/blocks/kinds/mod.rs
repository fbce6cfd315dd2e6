pub mod block_quote;
pub mod conditional_block;
pub mod heading;
pub mod language_block;
pub mod list;
pub mod paragraph;
pub mod rule;

pub use block_quote::BlockQuote;
pub use conditional_block::ConditionalBlock;
pub use heading::Heading;
pub use language_block::LanguageBlock;
pub use list::ListMarker;
pub use paragraph::Paragraph;
pub use rule::ThematicBreak;
