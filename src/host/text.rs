use ropey::Rope;

use super::LineRange;

/// Line-addressed text content of a host buffer, backed by a rope.
///
/// Like an editor buffer it always holds at least one (possibly empty) line.
/// Lines are separated by `\n` only; carriage returns and Unicode line
/// separators are ordinary content. There is no terminator after the last
/// line.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create a buffer from raw text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Create a buffer holding exactly `lines`.
    pub fn from_lines(lines: &[String]) -> Self {
        Self::from_text(&lines.join("\n"))
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.trim_end_matches('\n').to_string())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Lines in `range`, or `None` if the range is out of bounds.
    pub fn lines(&self, range: LineRange) -> Option<Vec<String>> {
        let (start, end) = self.bounds(range)?;
        (start..end).map(|idx| self.line_at(idx)).collect()
    }

    /// Replace the lines in `range` with `lines`.
    ///
    /// Returns `false` (leaving the buffer untouched) if the range is out of
    /// bounds.
    pub fn replace_lines(&mut self, range: LineRange, lines: &[String]) -> bool {
        let Some((start, end)) = self.bounds(range) else {
            return false;
        };
        let count = self.line_count();

        if end < count {
            // Every removed line carries its own newline.
            let from = self.rope.line_to_char(start);
            let to = self.rope.line_to_char(end);
            self.rope.remove(from..to);
            let insert: String = lines.iter().map(|l| format!("{l}\n")).collect();
            self.rope.insert(from, &insert);
            return true;
        }

        if start == count {
            // Append after the last line.
            let at = self.rope.len_chars();
            let insert: String = lines.iter().map(|l| format!("\n{l}")).collect();
            self.rope.insert(at, &insert);
            return true;
        }

        // Replace through the end of the buffer.
        let mut from = self.rope.line_to_char(start);
        if lines.is_empty() && start > 0 {
            // Drop the separator before the first removed line too.
            from -= 1;
        }
        let to = self.rope.len_chars();
        self.rope.remove(from..to);
        self.rope.insert(from, &lines.join("\n"));
        true
    }

    fn bounds(&self, range: LineRange) -> Option<(usize, usize)> {
        let count = self.line_count();
        let end = range.end.unwrap_or(count);
        (range.start <= end && end <= count).then_some((range.start, end))
    }
}
