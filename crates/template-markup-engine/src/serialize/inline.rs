use crate::model::{Mark, TextRun};
use crate::options::MarkupOptions;
use std::cmp::Reverse;

fn open(mark: &Mark, options: &MarkupOptions) -> String {
    match mark {
        Mark::ConditionalInline { condition } => {
            format!("(({}??", options.condition_or_default(condition))
        }
        Mark::Link { .. } => "[".to_string(),
        Mark::Bold => "**".to_string(),
        Mark::Italic => "_".to_string(),
        Mark::Variable => "((".to_string(),
    }
}

fn close(mark: &Mark) -> String {
    match mark {
        Mark::ConditionalInline { .. } | Mark::Variable => "))".to_string(),
        Mark::Link { href } => format!("]({href})"),
        Mark::Bold => "**".to_string(),
        Mark::Italic => "_".to_string(),
    }
}

/// Renders inline runs back to markup.
///
/// Marks are kept open across runs while the next run still carries them, so
/// `((c??a **b**))` is written as one conditional rather than two. Variables
/// never span runs and close at every run boundary. Italic delimiters are
/// placed where the parser reads them back: whitespace moves outside them and
/// `*` replaces `_` inside a word.
pub fn serialize_inline(runs: &[TextRun], options: &MarkupOptions) -> String {
    let events = flank_italics(mark_events(runs));
    let mut pieces: Vec<String> = events
        .iter()
        .map(|event| match event {
            Event::Open(mark) => open(mark, options),
            Event::Close(mark) => close(mark),
            Event::Text(text) => text.to_string(),
        })
        .collect();

    let mut italic_open = None;
    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Open(Mark::Italic) => italic_open = Some(i),
            Event::Close(Mark::Italic) => {
                if let Some(o) = italic_open.take()
                    && touches_word(&pieces, o, i)
                {
                    pieces[o] = ITALIC_STAR.to_string();
                    pieces[i] = ITALIC_STAR.to_string();
                }
            }
            _ => {}
        }
    }
    pieces.concat()
}

const ITALIC_STAR: &str = "*";

/// Whether the text just before `open` or just after `close` is alphanumeric.
fn touches_word(pieces: &[String], open: usize, close: usize) -> bool {
    let before = pieces[..open].iter().rev().find_map(|p| p.chars().next_back());
    let after = pieces[close + 1..].iter().find_map(|p| p.chars().next());
    before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric)
}

/// Moves whitespace directly inside italic delimiters to the outside, and
/// drops italics left with no text.
fn flank_italics(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut after_open = false;
    for event in events {
        match event {
            Event::Open(Mark::Italic) => {
                after_open = true;
                out.push(event);
            }
            Event::Text(text) if after_open => {
                after_open = false;
                let body = text.trim_start();
                let lead = &text[..text.len() - body.len()];
                if !lead.is_empty() {
                    let opener = out.pop();
                    out.push(Event::Text(lead));
                    out.extend(opener);
                }
                if !body.is_empty() {
                    out.push(Event::Text(body));
                }
            }
            Event::Close(Mark::Italic) => {
                after_open = false;
                let mut trail = "";
                if let Some(Event::Text(text)) = out.last().copied() {
                    let body = text.trim_end();
                    trail = &text[body.len()..];
                    out.pop();
                    if !body.is_empty() {
                        out.push(Event::Text(body));
                    }
                }
                if matches!(out.last(), Some(Event::Open(Mark::Italic))) {
                    out.pop();
                } else {
                    out.push(event);
                }
                if !trail.is_empty() {
                    out.push(Event::Text(trail));
                }
            }
            other => {
                after_open = false;
                out.push(other);
            }
        }
    }
    out
}

/// One step of a rendered inline sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Event<'a> {
    Open(&'a Mark),
    Close(&'a Mark),
    Text(&'a str),
}

/// Number of runs from `from` on that carry `mark` without a break.
fn extent(runs: &[TextRun], from: usize, mark: &Mark) -> usize {
    if !mark.is_spanning() {
        return 1;
    }
    runs[from..]
        .iter()
        .take_while(|run| run.marks.contains(mark))
        .count()
}

/// Whether the text an italic opened at run `from` would wrap begins or ends
/// with whitespace.
fn italic_edge_is_space(runs: &[TextRun], from: usize, len: usize) -> bool {
    let first = runs[from].text.starts_with(char::is_whitespace);
    let last = runs[from + len - 1].text.ends_with(char::is_whitespace);
    first || last
}

/// Walks runs with a stack of open marks, producing open/close events as
/// marks start and end.
///
/// A mark stays open while the following runs carry it. Marks opening at the
/// same run are ordered by how long they last, longest outermost, so nested
/// markup comes back out nested the way it was written. Ties keep kind order,
/// except that an italic wrapping text with an outer space goes outermost.
pub(crate) fn mark_events(runs: &[TextRun]) -> Vec<Event<'_>> {
    let mut events = vec![];
    let mut active: Vec<&Mark> = vec![];

    for (i, run) in runs.iter().enumerate() {
        let keep = active
            .iter()
            .take_while(|m| m.is_spanning() && run.marks.contains(**m))
            .count();
        while active.len() > keep {
            if let Some(mark) = active.pop() {
                events.push(Event::Close(mark));
            }
        }
        let mut opening: Vec<(&Mark, usize)> = run
            .marks
            .iter()
            .filter(|m| !active.contains(m))
            .map(|m| (m, extent(runs, i, m)))
            .collect();
        opening.sort_by_key(|&(mark, len)| {
            let spaced_italic = *mark == Mark::Italic && italic_edge_is_space(runs, i, len);
            (Reverse(len), !spaced_italic)
        });
        for (mark, _) in opening {
            events.push(Event::Open(mark));
            active.push(mark);
        }
        events.push(Event::Text(&run.text));
    }
    while let Some(mark) = active.pop() {
        events.push(Event::Close(mark));
    }
    events
}

/// Renders runs with the given open/close/text projections. Shared with the
/// HTML renderer.
pub(crate) fn render_runs(
    runs: &[TextRun],
    open: impl Fn(&Mark) -> String,
    close: impl Fn(&Mark) -> String,
    text: impl Fn(&str) -> String,
) -> String {
    mark_events(runs)
        .into_iter()
        .map(|event| match event {
            Event::Open(mark) => open(mark),
            Event::Close(mark) => close(mark),
            Event::Text(t) => text(t),
        })
        .collect()
}
