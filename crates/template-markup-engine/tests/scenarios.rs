use pretty_assertions::assert_eq;
use template_markup_engine::navigation::{Focus, Key, LabelTarget};
use template_markup_engine::{Block, Editor, Mark, MarkupOptions, TextRun};

fn type_chars(editor: &mut Editor, text: &str) {
    for ch in text.chars() {
        assert!(editor.type_text(&ch.to_string()), "typing {ch:?} failed");
    }
}

#[test]
fn typed_variables_stay_distinct() {
    let mut editor = Editor::from_markup("", MarkupOptions::default());
    type_chars(&mut editor, "((a))((b))");
    assert_eq!(
        editor.state().doc.content[0],
        Block::paragraph(vec![
            TextRun::new("a", vec![Mark::Variable]),
            TextRun::new("b", vec![Mark::Variable]),
        ])
    );
}

#[test]
fn enter_inside_inline_conditional_converts_to_block() {
    let mut editor = Editor::from_markup("", MarkupOptions::default());
    type_chars(&mut editor, "((v??content))");
    // 0 <p> 1 "con" 4 "tent" 8
    assert!(editor.set_selection(4..4));
    assert!(editor.press(Key::Enter));

    assert_eq!(
        editor.state().doc.content,
        vec![Block::conditional(
            "v",
            vec![
                Block::paragraph(vec![TextRun::plain("con")]),
                Block::paragraph(vec![TextRun::plain("tent")]),
            ]
        )]
    );
    assert!(
        !editor.state().doc.content[0]
            .contains_run(&|r: &TextRun| r.marks.iter().any(|m| m.condition().is_some()))
    );
    // 0 <cond> 1 <p> 2 "con" 5 </p> 6 <p> 7 "tent"
    assert_eq!(editor.state().selection, 7..7);
    assert!(!editor.flush_deferred());
    assert_eq!(editor.to_markup(), "((v??\ncon\n\ntent\n))");
}

#[test]
fn leaving_a_whole_line_conditional_inserts_a_space() {
    let mut editor = Editor::from_markup("((v??c))", MarkupOptions::default());
    editor.set_focus(Focus::ConditionLabel {
        target: LabelTarget::Inline { pos: 1 },
        caret: 0,
    });
    // Through the one-char label into the content.
    assert!(editor.press(Key::ArrowRight));
    assert!(editor.press(Key::ArrowRight));
    assert_eq!(editor.focus(), Focus::Content);
    assert_eq!(editor.state().selection, 1..1);
    // Over the content char, then out past the boundary.
    assert!(editor.press(Key::ArrowRight));
    assert!(editor.press(Key::ArrowRight));

    let state = editor.state();
    assert_eq!(
        state.doc.content[0],
        Block::paragraph(vec![
            TextRun::new("c", vec![Mark::conditional("v")]),
            TextRun::plain(" "),
        ])
    );
    assert_eq!(state.selection, 3..3);
    assert_eq!(state.stored_marks, Some(vec![]));
    assert_eq!(state.synthetic_space, Some(2));

    // Stepping back in removes the space again.
    assert!(editor.press(Key::ArrowLeft));
    assert_eq!(editor.to_markup(), "((v??c))");
    assert_eq!(editor.state().selection, 2..2);
}

#[test]
fn typing_after_leaving_stays_outside() {
    let mut editor = Editor::from_markup("((v??c)) tail", MarkupOptions::default());
    // 0 <p> 1 "c" 2 " tail"
    editor.set_selection(2..2);
    assert!(editor.press(Key::ArrowRight));
    type_chars(&mut editor, "x");
    assert_eq!(editor.to_markup(), "((v??c))x tail");
}
