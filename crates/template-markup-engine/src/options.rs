use crate::model::DEFAULT_CONDITION;

/// Settings the engine takes from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Condition written for conditionals whose condition is empty.
    pub default_condition: String,
    /// Blockquote marker used when serializing for storage.
    pub quote_marker: char,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            default_condition: DEFAULT_CONDITION.to_string(),
            quote_marker: '^',
        }
    }
}

impl MarkupOptions {
    /// `condition`, or the default when it is blank.
    pub fn condition_or_default<'a>(&'a self, condition: &'a str) -> &'a str {
        let trimmed = condition.trim();
        if trimmed.is_empty() {
            &self.default_condition
        } else {
            trimmed
        }
    }
}
