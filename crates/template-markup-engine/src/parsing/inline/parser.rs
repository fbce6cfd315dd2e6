use crate::model::{Mark, TextRun, mark::with_mark, text::normalize_runs};
use crate::parsing::{ParseContext, scanner::scan_markers};

use super::{
    cursor::Cursor,
    kinds::{Bold, Conditional, Italic, Link, Variable},
};

/// A recognised inline construct, borrowing from the source text.
enum Inline<'a> {
    Conditional { condition: &'a str, content: &'a str },
    Variable { name: &'a str },
    Bold(&'a str),
    Italic(&'a str),
    Link { text: &'a str, href: &'a str },
}

/// Parses one text block's inline markup into normalized runs.
///
/// # Precedence
/// At each position an inline conditional is tried before a variable, so
/// `((a??b))` never reads as a variable named `a??b`. Conditional content is
/// parsed again with conditionals disabled; variables and emphasis inside it
/// still apply.
pub fn parse_inline(s: &str, ctx: ParseContext) -> Vec<TextRun> {
    let mut out = vec![];
    parse_into(s, ctx, &[], &mut out);
    normalize_runs(out)
}

fn parse_into(s: &str, ctx: ParseContext, marks: &[Mark], out: &mut Vec<TextRun>) {
    let mut cur = Cursor::new(s);
    let mut text_start = 0;

    fn flush_text(out: &mut Vec<TextRun>, text: &str, marks: &[Mark]) {
        if !text.is_empty() {
            out.push(TextRun::new(text, marks.to_vec()));
        }
    }

    while !cur.eof() {
        let start = cur.i;
        let Some(found) = try_parse_construct(&mut cur, ctx) else {
            cur.bump_char();
            continue;
        };
        flush_text(out, &s[text_start..start], marks);
        match found {
            Inline::Conditional { condition, content } => parse_into(
                content,
                ctx.inside_conditional(),
                &with_mark(marks, Mark::conditional(condition.trim())),
                out,
            ),
            Inline::Variable { name } => {
                out.push(TextRun::new(name.trim(), with_mark(marks, Mark::Variable)))
            }
            Inline::Bold(inner) => parse_into(inner, ctx, &with_mark(marks, Mark::Bold), out),
            Inline::Italic(inner) => {
                parse_into(inner, ctx, &with_mark(marks, Mark::Italic), out)
            }
            Inline::Link { text, href } => parse_into(
                text,
                ctx,
                &with_mark(
                    marks,
                    Mark::Link {
                        href: href.to_string(),
                    },
                ),
                out,
            ),
        }
        text_start = cur.i;
    }

    flush_text(out, &s[text_start..], marks);
}

fn try_parse_construct<'a>(cur: &mut Cursor<'a>, ctx: ParseContext) -> Option<Inline<'a>> {
    if ctx.allow_conditional
        && let Some(found) = try_parse_conditional(cur)
    {
        return Some(found);
    }
    try_parse_variable(cur)
        .or_else(|| try_parse_bold(cur))
        .or_else(|| try_parse_italic(cur))
        .or_else(|| try_parse_link(cur))
}

/// Attempts `((condition??content))` at the cursor.
///
/// The closing `))` is found with the balanced marker scan, so variables in
/// the content do not end it early. Cursor only moves on success.
fn try_parse_conditional<'a>(cur: &mut Cursor<'a>) -> Option<Inline<'a>> {
    let rest = cur.rest();
    if rest.len() < Conditional::MIN_LEN || !cur.starts_with(Conditional::OPEN) {
        return None;
    }
    let (condition, body_at) = Conditional::split_header(rest)?;
    let scan = scan_markers(&rest[body_at..], 0);
    let close = scan.close?;
    if !Conditional::is_valid_content(scan.content) {
        return None;
    }
    cur.bump_n(body_at + close + Conditional::CLOSE.len());
    Some(Inline::Conditional {
        condition,
        content: scan.content,
    })
}

/// Attempts `((name))` at the cursor, closing at the first `))`.
fn try_parse_variable<'a>(cur: &mut Cursor<'a>) -> Option<Inline<'a>> {
    if !cur.starts_with(Variable::OPEN) {
        return None;
    }
    let body = &cur.rest()[Variable::OPEN.len()..];
    let close = body.find(Variable::CLOSE)?;
    let name = &body[..close];
    if !Variable::is_valid_name(name) {
        return None;
    }
    cur.bump_n(Variable::OPEN.len() + close + Variable::CLOSE.len());
    Some(Inline::Variable { name })
}

fn try_parse_bold<'a>(cur: &mut Cursor<'a>) -> Option<Inline<'a>> {
    if !cur.starts_with(Bold::DELIM) {
        return None;
    }
    let body = &cur.rest()[Bold::DELIM.len()..];
    let close = body.find("**")?;
    let inner = &body[..close];
    if inner.trim().is_empty() {
        return None;
    }
    cur.bump_n(close + 2 * Bold::DELIM.len());
    Some(Inline::Bold(inner))
}

/// Attempts `_italic_` (or `*italic*`) using word-boundary flanking: the opener
/// is not preceded by a letter or digit and not followed by whitespace; the
/// closer mirrors that.
fn try_parse_italic<'a>(cur: &mut Cursor<'a>) -> Option<Inline<'a>> {
    let delim = cur
        .peek()
        .filter(|b| *b == Italic::UNDERSCORE || *b == Italic::STAR)?;
    if delim == Italic::STAR && cur.starts_with(Bold::DELIM) {
        return None;
    }
    if delim == Italic::UNDERSCORE && cur.prev_char().is_some_and(char::is_alphanumeric) {
        return None;
    }
    let body = &cur.rest()[1..];
    if body.is_empty() || body.starts_with(char::is_whitespace) {
        return None;
    }

    for (idx, ch) in body.char_indices().skip(1) {
        if ch != delim as char {
            continue;
        }
        let before = body[..idx].chars().next_back();
        let after = body[idx + 1..].chars().next();
        if before.is_some_and(char::is_whitespace) {
            continue;
        }
        if delim == Italic::UNDERSCORE && after.is_some_and(char::is_alphanumeric) {
            continue;
        }
        if delim == Italic::STAR && after == Some('*') {
            continue;
        }
        cur.bump_n(idx + 2);
        return Some(Inline::Italic(&body[..idx]));
    }
    None
}

fn try_parse_link<'a>(cur: &mut Cursor<'a>) -> Option<Inline<'a>> {
    if cur.peek() != Some(Link::OPEN) {
        return None;
    }
    let body = &cur.rest()[1..];
    let mid = body.find(Link::MIDDLE)?;
    let text = &body[..mid];
    if text.is_empty() || text.contains(['[', ']', '\n']) {
        return None;
    }
    let after = &body[mid + Link::MIDDLE.len()..];
    let close = after.find(Link::CLOSE)?;
    let href = &after[..close];
    if href.is_empty() || href.contains(char::is_whitespace) {
        return None;
    }
    cur.bump_n(1 + mid + Link::MIDDLE.len() + close + 1);
    Some(Inline::Link { text, href })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(s: &str) -> Vec<TextRun> {
        parse_inline(s, ParseContext::default())
    }

    fn cond(condition: &str, text: &str) -> TextRun {
        TextRun::new(text, vec![Mark::conditional(condition)])
    }

    #[test]
    fn plain_text_is_one_run() {
        assert_eq!(parse("hello world"), vec![TextRun::plain("hello world")]);
    }

    #[test]
    fn inline_conditional() {
        assert_eq!(
            parse("Hi ((is vip??welcome back)) friend"),
            vec![
                TextRun::plain("Hi "),
                cond("is vip", "welcome back"),
                TextRun::plain(" friend"),
            ]
        );
    }

    #[test]
    fn condition_is_trimmed() {
        assert_eq!(parse("(( a ??b))"), vec![cond("a", "b")]);
    }

    #[test]
    fn variable_inside_conditional_content() {
        assert_eq!(
            parse("((x??Hi ((name))!))"),
            vec![
                cond("x", "Hi "),
                TextRun::new("name", vec![Mark::conditional("x"), Mark::Variable]),
                cond("x", "!"),
            ]
        );
    }

    #[test]
    fn triple_paren_keeps_inner_paren_in_content() {
        assert_eq!(parse("((v??f(x)))"), vec![cond("v", "f(x)")]);
    }

    #[test]
    fn adjacent_variables_stay_separate() {
        assert_eq!(
            parse("((a))((b))"),
            vec![
                TextRun::new("a", vec![Mark::Variable]),
                TextRun::new("b", vec![Mark::Variable]),
            ]
        );
    }

    #[test]
    fn nested_conditional_is_not_parsed_inside_content() {
        let runs = parse("((a??x ((b??y)) z))");
        assert_eq!(runs, vec![cond("a", "x ((b??y)) z")]);
    }

    #[rstest]
    #[case("((a??))")]
    #[case("((a??   ))")]
    #[case("((??b))")]
    #[case("((a??b")]
    #[case("(())")]
    fn malformed_markup_stays_text(#[case] s: &str) {
        assert_eq!(parse(s), vec![TextRun::plain(s)]);
    }

    #[test]
    fn conditionals_disabled_by_context() {
        let ctx = ParseContext::default().inside_conditional();
        assert_eq!(
            parse_inline("((a??b))", ctx),
            vec![TextRun::plain("((a??b))")]
        );
    }

    #[test]
    fn emphasis_and_links() {
        assert_eq!(
            parse("**bold** _it_ [site](https://x.test)"),
            vec![
                TextRun::new("bold", vec![Mark::Bold]),
                TextRun::plain(" "),
                TextRun::new("it", vec![Mark::Italic]),
                TextRun::plain(" "),
                TextRun::new(
                    "site",
                    vec![Mark::Link {
                        href: "https://x.test".into()
                    }]
                ),
            ]
        );
    }

    #[test]
    fn star_italic_accepted() {
        assert_eq!(parse("*it*"), vec![TextRun::new("it", vec![Mark::Italic])]);
    }

    #[test]
    fn underscore_inside_words_is_text() {
        assert_eq!(parse("snake_case_name"), vec![TextRun::plain("snake_case_name")]);
    }

    #[test]
    fn unicode_text_survives() {
        assert_eq!(
            parse("Café ((fr??déjà vu))"),
            vec![TextRun::plain("Café "), cond("fr", "déjà vu")]
        );
    }
}
