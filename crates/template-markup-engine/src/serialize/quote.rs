//! Conversion between the storage blockquote marker `^` and the display
//! marker `>`.

use crate::parsing::blocks::kinds::BlockQuote;

/// Rewrites leading `^` quote markers as `>` for display.
pub fn to_display_form(text: &str) -> String {
    swap_markers(text, BlockQuote::STORAGE_PREFIX, '>')
}

/// Rewrites leading `>` quote markers as `^` for storage.
pub fn to_storage_form(text: &str) -> String {
    swap_markers(text, '>', BlockQuote::STORAGE_PREFIX)
}

fn swap_markers(text: &str, from: char, to: char) -> String {
    text.split('\n')
        .map(|line| {
            let lead = line.len() - line.trim_start_matches(' ').len();
            let (indent, rest) = line.split_at(lead);
            let markers = rest
                .chars()
                .take_while(|c| *c == from || *c == ' ')
                .collect::<String>();
            if !markers.contains(from) {
                return line.to_string();
            }
            let swapped: String = markers
                .chars()
                .map(|c| if c == from { to } else { c })
                .collect();
            format!("{indent}{swapped}{}", &rest[markers.len()..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("^ quoted", "> quoted")]
    #[case("^ ^ nested", "> > nested")]
    #[case("plain ^ text", "plain ^ text")]
    #[case("  ^ indented\nnext", "  > indented\nnext")]
    fn converts_leading_markers(#[case] storage: &str, #[case] display: &str) {
        assert_eq!(to_display_form(storage), display);
        assert_eq!(to_storage_form(display), storage);
    }
}
