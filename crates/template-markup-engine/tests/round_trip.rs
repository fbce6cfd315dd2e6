use pretty_assertions::assert_eq;
use rstest::rstest;
use template_markup_engine::model::check;
use template_markup_engine::{Block, Document, parse_markup, serialize};

fn normalize(text: &str) -> String {
    serialize(&parse_markup(text))
}

#[rstest]
#[case::variable("((name))")]
#[case::variable_with_spaces("Hi ((  first name  ))!")]
#[case::unicode_condition("((café ✓??déjà vu))")]
#[case::inline_conditional("before ((v??c)) after")]
#[case::block_conditional("((v??\nc\n))")]
#[case::block_with_list("((v??\n- a\n- b\n))")]
#[case::english("[[en]]\nHello\n[[/en]]")]
#[case::french_with_conditional("[[fr]]\n((v??\nSalut ((name))\n))\n[[/fr]]")]
#[case::mixed("((var1))((var2)) text ((cond??body))")]
#[case::formatting("**bold** _it_ [link](https://x.test) ((v??**b**))")]
fn serialize_is_stable_after_first_normalization(#[case] input: &str) {
    let first = normalize(input);
    assert_eq!(normalize(&first), first);
    assert!(check(&parse_markup(&first)).is_ok());
}

#[rstest]
#[case::conditional_in_italic("_a ((v??b))_")]
#[case::conditional_ends_italic("x _a ((v??b))_ y")]
#[case::conditional_in_bold("**a ((v??b)) c**")]
#[case::conditional_in_link("[a ((v??x))](h)")]
#[case::italic_in_word("a*b*c")]
#[case::italic_in_conditional("((v??a _b_ c))")]
#[case::italic_spans_conditional("_((v??a b)) c_")]
#[case::spaced_conditional_in_italic("_((v?? b))_")]
#[case::variable_in_bold("**Hi ((name))**")]
#[case::bold_italic("**_both_**")]
fn overlapping_marks_survive_round_trip(#[case] input: &str) {
    let doc = parse_markup(input);
    assert_eq!(parse_markup(&serialize(&doc)), doc);
}

#[test]
fn mixed_content_round_trips_byte_identical() {
    let first = normalize("((var1))((var2)) text ((cond??body))");
    assert_eq!(first, "((var1))((var2)) text ((cond??body))");
    assert_eq!(normalize(&first), first);
}

#[test]
fn identifiers_are_trimmed_at_boundaries_only() {
    assert_eq!(normalize("((  first name  ))"), "((first name))");
}

#[test]
fn json_tree_round_trips() {
    let doc = parse_markup("[[en]]\n((v??\nHi ((name))\n))\n[[/en]]");
    let json = doc.to_json().unwrap();
    assert_eq!(Document::from_json(&json).unwrap(), doc);
}

#[rstest]
#[case::order_shipped("order_shipped")]
#[case::language_sections("language_sections")]
#[case::declined_markup("declined_markup")]
fn fixture_is_stable(#[case] name: &str) {
    let text = std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let doc = parse_markup(&text);
    assert!(check(&doc).is_ok(), "{name} violates document invariants");
    let first = serialize(&doc);
    assert_eq!(normalize(&first), first);
}

#[test]
fn fixture_structure() {
    let text = std::fs::read_to_string(format!(
        "{}/tests/fixtures/order_shipped.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    let kinds: Vec<&str> = parse_markup(&text)
        .content
        .iter()
        .map(Block::type_name)
        .collect();
    assert_eq!(
        kinds,
        vec![
            "heading",
            "paragraph",
            "conditionalBlock",
            "languageBlock",
            "blockquote"
        ]
    );
}
