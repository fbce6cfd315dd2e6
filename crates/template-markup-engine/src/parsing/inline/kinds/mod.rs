//! # Inline Kinds
//!
//! Each inline construct owns its delimiters; the parser never hardcodes them.

pub mod conditional;
pub mod emphasis;
pub mod link;
pub mod variable;

pub use conditional::Conditional;
pub use emphasis::{Bold, Italic};
pub use link::Link;
pub use variable::Variable;
