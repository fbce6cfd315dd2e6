/// List item markers: `- `, `* `, `+ ` or `1. `.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Ordered(u64),
}

impl ListMarker {
    pub const BULLETS: [char; 3] = ['-', '*', '+'];
    pub const STORAGE_BULLET: &'static str = "- ";

    /// Parses a marker at the start of `s`, returning it with the byte width
    /// of marker plus its following space.
    pub fn parse(s: &str) -> Option<(ListMarker, usize)> {
        let first = s.chars().next()?;
        if Self::BULLETS.contains(&first) {
            return Self::after_marker(s, 1).map(|w| (ListMarker::Bullet, w));
        }
        let digits = s.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || digits > 9 || s.as_bytes().get(digits) != Some(&b'.') {
            return None;
        }
        let number = s[..digits].parse().ok()?;
        Self::after_marker(s, digits + 1).map(|w| (ListMarker::Ordered(number), w))
    }

    fn after_marker(s: &str, len: usize) -> Option<usize> {
        match s.as_bytes().get(len) {
            None => Some(len),
            Some(b' ') => Some(len + 1),
            _ => None,
        }
    }

    pub fn same_list(self, other: ListMarker) -> bool {
        matches!(
            (self, other),
            (ListMarker::Bullet, ListMarker::Bullet) | (ListMarker::Ordered(_), ListMarker::Ordered(_))
        )
    }

    /// Marker text written for item `index` of a list starting at `start`.
    pub fn render(ordered_start: Option<u64>, index: usize) -> String {
        match ordered_start {
            Some(start) => format!("{}. ", start + index as u64),
            None => Self::STORAGE_BULLET.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_markers() {
        assert_eq!(ListMarker::parse("- item"), Some((ListMarker::Bullet, 2)));
        assert_eq!(ListMarker::parse("12. item"), Some((ListMarker::Ordered(12), 4)));
        assert_eq!(ListMarker::parse("-"), Some((ListMarker::Bullet, 1)));
        assert_eq!(ListMarker::parse("-item"), None);
        assert_eq!(ListMarker::parse("1.5"), None);
    }
}
