/// ATX heading `# text` .. `###### text`.
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: u8 = 6;

    /// Returns the level and the heading text.
    pub fn parse(s: &str) -> Option<(u8, &str)> {
        let hashes = s.chars().take_while(|c| *c == Self::MARKER).count();
        if hashes == 0 || hashes > Self::MAX_LEVEL as usize {
            return None;
        }
        let rest = &s[hashes..];
        if !rest.is_empty() && !rest.starts_with(' ') {
            return None;
        }
        Some((hashes as u8, rest.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(Heading::parse("## Title "), Some((2, "Title")));
        assert_eq!(Heading::parse("#"), Some((1, "")));
        assert_eq!(Heading::parse("#hashtag"), None);
        assert_eq!(Heading::parse("####### seven"), None);
    }
}
