//! Inline text runs and the offset arithmetic over them.
//!
//! Offsets are counted in `char`s, matching one document position per character.

use serde::{Deserialize, Serialize};

use super::mark::Mark;

/// A stretch of text sharing one set of marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        let mut marks = marks;
        marks.sort_by_key(Mark::kind);
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, vec![])
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn merges_with(&self, next: &TextRun) -> bool {
        self.marks == next.marks && self.marks.iter().all(Mark::is_spanning)
    }
}

/// Total character length of a run sequence.
pub fn inline_len(runs: &[TextRun]) -> usize {
    runs.iter().map(TextRun::len).sum()
}

/// Concatenated text of all runs.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Byte index of the `n`th char of `s` (or `s.len()` past the end).
pub fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Char index of byte offset `b` in `s`.
pub fn char_offset(s: &str, b: usize) -> usize {
    s[..b].chars().count()
}

/// Drops empty runs and merges neighbours with identical spanning marks.
pub fn normalize_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.merges_with(&run) => last.text.push_str(&run.text),
            _ => out.push(run),
        }
    }
    out
}

/// Splits runs at char offset `at`.
pub fn split_runs(runs: &[TextRun], at: usize) -> (Vec<TextRun>, Vec<TextRun>) {
    let mut left = vec![];
    let mut right = vec![];
    let mut pos = 0;
    for run in runs {
        let len = run.len();
        if pos + len <= at {
            left.push(run.clone());
        } else if pos >= at {
            right.push(run.clone());
        } else {
            let cut = byte_offset(&run.text, at - pos);
            left.push(TextRun::new(&run.text[..cut], run.marks.clone()));
            right.push(TextRun::new(&run.text[cut..], run.marks.clone()));
        }
        pos += len;
    }
    (left, right)
}

/// Runs covering chars `from..to`.
pub fn slice_runs(runs: &[TextRun], from: usize, to: usize) -> Vec<TextRun> {
    let (_, rest) = split_runs(runs, from);
    let (mid, _) = split_runs(&rest, to.saturating_sub(from));
    mid
}

pub fn insert_text(runs: &[TextRun], at: usize, text: &str, marks: &[Mark]) -> Vec<TextRun> {
    let (mut out, right) = split_runs(runs, at);
    out.push(TextRun::new(text, marks.to_vec()));
    out.extend(right);
    normalize_runs(out)
}

pub fn insert_runs(runs: &[TextRun], at: usize, inserted: &[TextRun]) -> Vec<TextRun> {
    let (mut out, right) = split_runs(runs, at);
    out.extend(inserted.iter().cloned());
    out.extend(right);
    normalize_runs(out)
}

pub fn delete_text(runs: &[TextRun], from: usize, to: usize) -> Vec<TextRun> {
    let (mut out, rest) = split_runs(runs, from);
    let (_, right) = split_runs(&rest, to.saturating_sub(from));
    out.extend(right);
    normalize_runs(out)
}

/// Drops leading whitespace from the first non-blank run onwards.
pub fn trim_runs_start(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = runs
        .into_iter()
        .skip_while(|r| r.text.trim().is_empty())
        .collect();
    if let Some(first) = out.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    out
}

/// Drops trailing whitespace up to the last non-blank run.
pub fn trim_runs_end(mut runs: Vec<TextRun>) -> Vec<TextRun> {
    while runs.last().is_some_and(|r| r.text.trim().is_empty()) {
        runs.pop();
    }
    if let Some(last) = runs.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    runs
}

/// Applies `f` to the mark list of every run inside `from..to`.
pub fn map_marks(
    runs: &[TextRun],
    from: usize,
    to: usize,
    f: impl Fn(&mut Vec<Mark>),
) -> Vec<TextRun> {
    let (mut out, rest) = split_runs(runs, from);
    let (mut mid, right) = split_runs(&rest, to.saturating_sub(from));
    for run in &mut mid {
        f(&mut run.marks);
    }
    out.extend(mid);
    out.extend(right);
    normalize_runs(out)
}

/// Marks of the char at `offset`, if there is one.
pub fn marks_of_char(runs: &[TextRun], offset: usize) -> Option<&[Mark]> {
    let mut pos = 0;
    for run in runs {
        let len = run.len();
        if offset < pos + len {
            return Some(&run.marks);
        }
        pos += len;
    }
    None
}

/// Marks that text typed at `offset` would pick up.
///
/// At the start of a text block nothing is inherited. Elsewhere the marks of the
/// preceding char apply, except non-inclusive marks which only carry over when
/// the following char has them too.
pub fn marks_at(runs: &[TextRun], offset: usize) -> Vec<Mark> {
    if offset == 0 {
        return vec![];
    }
    let Some(before) = marks_of_char(runs, offset - 1) else {
        return vec![];
    };
    let after = marks_of_char(runs, offset).unwrap_or(&[]);
    before
        .iter()
        .filter(|m| m.is_inclusive() || after.contains(m))
        .cloned()
        .collect()
}
