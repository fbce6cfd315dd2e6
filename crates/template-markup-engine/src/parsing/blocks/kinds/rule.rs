/// Horizontal rule: three or more of `-`, `*` or `_` alone on a line.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const CANONICAL: &'static str = "---";

    pub fn is_rule(s: &str) -> bool {
        let s = s.trim();
        let Some(first) = s.chars().next() else {
            return false;
        };
        matches!(first, '-' | '*' | '_') && s.len() >= 3 && s.chars().all(|c| c == first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_rules() {
        assert!(ThematicBreak::is_rule("---"));
        assert!(ThematicBreak::is_rule("*****"));
        assert!(!ThematicBreak::is_rule("--"));
        assert!(!ThematicBreak::is_rule("- - -"));
    }
}
