//! HTML projection of a document for display.
//!
//! Template constructs carry `data-type` attributes (`conditional`,
//! `conditional-inline`, `variable`, `language-en`, `language-fr`) so a host
//! stylesheet or script can find them.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::{Block, Document, Mark, TextRun};
use crate::serialize::inline::render_runs;

pub fn to_html(doc: &Document) -> String {
    blocks_html(&doc.content)
}

pub fn blocks_html(blocks: &[Block]) -> String {
    blocks.iter().map(block_html).collect()
}

pub fn block_html(block: &Block) -> String {
    match block {
        Block::Paragraph { content } => format!("<p>{}</p>", inline_html(content)),
        Block::Heading { level, content } => {
            format!("<h{level}>{}</h{level}>", inline_html(content))
        }
        Block::BulletList { content } => format!("<ul>{}</ul>", blocks_html(content)),
        Block::OrderedList { start, content } => {
            format!("<ol start=\"{start}\">{}</ol>", blocks_html(content))
        }
        Block::ListItem { content } => format!("<li>{}</li>", blocks_html(content)),
        Block::Blockquote { content } => {
            format!("<blockquote>{}</blockquote>", blocks_html(content))
        }
        Block::HorizontalRule => "<hr>".to_string(),
        Block::ConditionalBlock { condition, content } => format!(
            "<div data-type=\"conditional\" data-condition=\"{}\">{}</div>",
            encode_double_quoted_attribute(condition),
            blocks_html(content)
        ),
        Block::LanguageBlock { language, content } => format!(
            "<div data-type=\"language-{}\">{}</div>",
            language.code(),
            blocks_html(content)
        ),
    }
}

fn open_tag(mark: &Mark) -> String {
    match mark {
        Mark::ConditionalInline { condition } => format!(
            "<span data-type=\"conditional-inline\" data-condition=\"{}\">",
            encode_double_quoted_attribute(condition)
        ),
        Mark::Link { href } => format!("<a href=\"{}\">", encode_double_quoted_attribute(href)),
        Mark::Bold => "<strong>".to_string(),
        Mark::Italic => "<em>".to_string(),
        Mark::Variable => "<span data-type=\"variable\">".to_string(),
    }
}

fn close_tag(mark: &Mark) -> String {
    match mark {
        Mark::ConditionalInline { .. } | Mark::Variable => "</span>",
        Mark::Link { .. } => "</a>",
        Mark::Bold => "</strong>",
        Mark::Italic => "</em>",
    }
    .to_string()
}

pub fn inline_html(runs: &[TextRun]) -> String {
    render_runs(runs, open_tag, close_tag, |t| {
        encode_text(t).replace('\n', "<br>")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_markup;
    use insta::assert_snapshot;

    #[test]
    fn renders_constructs_with_data_types() {
        let doc = parse_markup("Hi ((name)), ((vip??<b>welcome</b>))\n\n[[en]]\nHello\n[[/en]]");
        assert_snapshot!(
            to_html(&doc),
            @r#"<p>Hi <span data-type="variable">name</span>, <span data-type="conditional-inline" data-condition="vip">&lt;b&gt;welcome&lt;/b&gt;</span></p><div data-type="language-en"><p>Hello</p></div>"#
        );
    }

    #[test]
    fn escapes_condition_attribute() {
        let doc = Document::new(vec![Block::conditional(
            "a \"b\"",
            vec![Block::empty_paragraph()],
        )]);
        assert_eq!(
            to_html(&doc),
            "<div data-type=\"conditional\" data-condition=\"a &quot;b&quot;\"><p></p></div>"
        );
    }
}
