//! Snippet builder - bounded context windows around a match

use crate::matcher::Match;
use std::ops::Range;

/// Characters of context kept on each side of a match before line splitting
pub const CONTEXT_CHARS: usize = 50;

/// Rendered context around a keyword occurrence
///
/// Holds at most one line before the matched line, the matched line, and at
/// most one line after it, plus the byte ranges of every occurrence of the
/// keyword within that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Plain snippet text (lines joined with `\n`)
    pub text: String,

    /// Byte ranges in `text` to highlight, in ascending order
    pub highlights: Vec<Range<usize>>,
}

impl Snippet {
    /// Render the snippet, passing every highlighted occurrence through `mark`
    ///
    /// # Examples
    ///
    /// ```
    /// use patrol_domain::Snippet;
    ///
    /// let snippet = Snippet { text: "Password: pw".to_string(), highlights: vec![0..8] };
    /// assert_eq!(snippet.highlight_with(|kw| format!("**{}**", kw)), "**Password**: pw");
    /// ```
    pub fn highlight_with<F>(&self, mark: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let mut out = String::with_capacity(self.text.len() + self.highlights.len() * 8);
        let mut cursor = 0;
        for range in &self.highlights {
            out.push_str(&self.text[cursor..range.start]);
            out.push_str(&mark(&self.text[range.clone()]));
            cursor = range.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

/// Build the snippet for `m` inside `text`
///
/// Returns `None` when the line holding the match start does not contain the
/// keyword once the window is split into lines.
pub fn render(text: &str, m: &Match) -> Option<Snippet> {
    if m.end() > text.len() || !text.is_char_boundary(m.offset) {
        return None;
    }

    let start = step_back(text, m.offset, CONTEXT_CHARS);
    let end = step_forward(text, m.end(), CONTEXT_CHARS);
    let window = &text[start..end];
    let relative = m.offset - start;

    let lines = line_spans(window);
    let index = lines
        .iter()
        .position(|(span, _)| span.contains(&relative))?;

    let (_, matched_line) = lines[index];
    if !m.keyword.pattern().is_match(matched_line) {
        return None;
    }

    let first = index.saturating_sub(1);
    let last = (index + 2).min(lines.len());
    let snippet_text = lines[first..last]
        .iter()
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    let highlights = m
        .keyword
        .pattern()
        .find_iter(&snippet_text)
        .filter(|found| !found.is_empty())
        .map(|found| found.range())
        .collect();

    Some(Snippet {
        text: snippet_text,
        highlights,
    })
}

/// Byte index `count` characters before `from` (clamped to 0)
fn step_back(text: &str, from: usize, count: usize) -> usize {
    if count == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte index `count` characters after `from` (clamped to the text length)
fn step_forward(text: &str, from: usize, count: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(count)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Split a window into lines, keeping the byte span each line occupies
///
/// The span includes the line terminator so that every byte of the window
/// belongs to exactly one line.
fn line_spans(window: &str) -> Vec<(Range<usize>, &str)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for piece in window.split_inclusive('\n') {
        let line = piece.strip_suffix('\n').unwrap_or(piece);
        let line = line.strip_suffix('\r').unwrap_or(line);
        spans.push((start..start + piece.len(), line));
        start += piece.len();
    }
    spans
}
