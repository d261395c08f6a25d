use serde::{Deserialize, Serialize};

/// A single logical line produced by [`normalize`].
///
/// `line_number` is the 1-based position in the original document, counted
/// before blank lines are dropped, so a result can be traced back to the
/// submitted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub raw_text: String,
    pub line_number: usize,
}

/// Output of [`normalize`]: the retained lines plus whether the line cap
/// dropped anything.
#[derive(Debug, Clone, Default)]
pub struct NormalizedInput {
    pub lines: Vec<LogLine>,
    pub truncated: bool,
}

/// Split a raw text blob into logical lines.
///
/// Splits on `\r\n`, `\n` and lone `\r`; trims trailing whitespace and
/// control characters; drops lines that are empty after trimming. At most
/// `max_lines` lines are kept. Dropping excess lines is policy, not an
/// error: `truncated` is set when at least one non-blank line fell past
/// the cap.
pub fn normalize(raw_text: &str, max_lines: usize) -> NormalizedInput {
    let mut lines = Vec::new();
    let mut truncated = false;
    for (idx, raw) in split_lines(raw_text).enumerate() {
        let trimmed = raw.trim_end_matches(|c: char| c.is_whitespace() || c.is_control());
        if trimmed.is_empty() {
            continue;
        }
        if lines.len() >= max_lines {
            truncated = true;
            break;
        }
        lines.push(LogLine {
            raw_text: trimmed.to_string(),
            line_number: idx + 1,
        });
    }
    NormalizedInput { lines, truncated }
}

// `str::lines` does not split on lone `\r`, which still shows up in logs
// pasted from old Mac tooling and from raw terminal captures.
fn split_lines(text: &str) -> SplitLines<'_> {
    SplitLines { rest: text }
}

struct SplitLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SplitLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find(|c| c == '\n' || c == '\r') {
            Some(pos) => {
                let line = &self.rest[..pos];
                let sep = if self.rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[pos + sep..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}
