use crate::model::Language;

/// Language section `[[en]] .. [[/en]]`.
pub struct LanguageBlock;

impl LanguageBlock {
    pub fn open_marker(language: Language) -> String {
        format!("[[{}]]", language.code())
    }

    pub fn close_marker(language: Language) -> String {
        format!("[[/{}]]", language.code())
    }

    /// Matches an opening marker at the start of `s`, case-insensitively.
    ///
    /// Returns the language and the byte offset just past the marker.
    pub fn opener(s: &str) -> Option<(Language, usize)> {
        Language::ALL.into_iter().find_map(|lang| {
            let marker = Self::open_marker(lang);
            let head = s.get(..marker.len())?;
            head.eq_ignore_ascii_case(&marker).then_some((lang, marker.len()))
        })
    }

    /// Byte offset of the closing marker for `language` in `s`.
    pub fn find_close(s: &str, language: Language) -> Option<usize> {
        s.to_ascii_lowercase().find(&Self::close_marker(language))
    }
}
