//! Rope-backed text storage.
//!
//! Responsibilities:
//! - text storage (Rope)
//! - 1-based (line, column) <-> char offset mapping, clamped to the document
//! - range reads and batched edits

use super::edit::{EndOfLine, SingleEditOperation};
use super::position::{Position, Range};
use ropey::Rope;
use std::io::{self, Write};

/// An edit resolved to char offsets: `start..end` replaced by `text`.
type ResolvedEdit<'a> = (usize, usize, &'a str);

#[derive(Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Streams the buffer into `writer` chunk by chunk.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for chunk in self.rope.chunks() {
            writer.write_all(chunk.as_bytes())?;
        }
        Ok(())
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of chars on `line_number` without its line terminator.
    pub fn line_len(&self, line_number: u32) -> usize {
        let row = line_number.saturating_sub(1) as usize;
        if row >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(row);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && line.char(len - 1) == '\r' {
            len -= 1;
        }
        len
    }

    /// Last valid column on `line_number`.
    pub fn line_max_column(&self, line_number: u32) -> u32 {
        self.line_len(line_number) as u32 + 1
    }

    pub fn clamp_position(&self, pos: Position) -> Position {
        let last_line = self.rope.len_lines().max(1) as u32;
        if pos.line_number < 1 {
            return Position::new(1, 1);
        }
        if pos.line_number > last_line {
            return Position::new(last_line, self.line_max_column(last_line));
        }
        let column = pos.column.clamp(1, self.line_max_column(pos.line_number));
        Position::new(pos.line_number, column)
    }

    pub fn pos_to_char(&self, pos: Position) -> usize {
        let pos = self.clamp_position(pos);
        let row = (pos.line_number - 1) as usize;
        self.rope.line_to_char(row) + (pos.column - 1) as usize
    }

    pub fn char_to_pos(&self, char_offset: usize) -> Position {
        let char_offset = char_offset.min(self.rope.len_chars());
        let row = self.rope.char_to_line(char_offset);
        let col = char_offset - self.rope.line_to_char(row);
        Position::new(row as u32 + 1, col as u32 + 1)
    }

    pub fn end_position(&self) -> Position {
        self.char_to_pos(self.rope.len_chars())
    }

    pub fn full_range(&self) -> Range {
        Range::from_positions(Position::new(1, 1), self.end_position())
    }

    pub fn text_in_range(&self, range: Range) -> String {
        let start = self.pos_to_char(range.start());
        let end = self.pos_to_char(range.end());
        self.rope.slice(start..end).to_string()
    }

    /// Whether `edits` can be applied as one batch: no two ranges overlap
    /// once clamped to the buffer. Touching ranges are fine.
    pub fn can_apply_edits(&self, edits: &[SingleEditOperation]) -> bool {
        self.resolve_edits(edits).is_some()
    }

    /// Applies `edits` as one batch. Ranges refer to the buffer before any
    /// edit of the batch is applied. Overlapping ranges reject the whole
    /// batch and leave the buffer untouched.
    pub fn apply_edits(&mut self, edits: &[SingleEditOperation]) -> bool {
        let Some(resolved) = self.resolve_edits(edits) else {
            return false;
        };
        for &(start, end, text) in resolved.iter().rev() {
            if end > start {
                self.rope.remove(start..end);
            }
            if !text.is_empty() {
                self.rope.insert(start, text);
            }
        }
        true
    }

    /// Edits as char offsets in ascending order, or `None` on overlap.
    fn resolve_edits<'a>(&self, edits: &'a [SingleEditOperation]) -> Option<Vec<ResolvedEdit<'a>>> {
        let mut resolved: Vec<ResolvedEdit<'a>> = edits
            .iter()
            .map(|edit| {
                let a = self.pos_to_char(edit.range.start());
                let b = self.pos_to_char(edit.range.end());
                (a.min(b), a.max(b), edit.text.as_deref().unwrap_or(""))
            })
            .collect();
        resolved.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        let overlaps = resolved.windows(2).any(|pair| pair[0].1 > pair[1].0);
        (!overlaps).then_some(resolved)
    }

    /// Rewrites every line terminator to `eol`.
    pub fn set_eol(&mut self, eol: EndOfLine) {
        let text = self.rope.to_string();
        let normalized = text.replace("\r\n", "\n");
        let converted = match eol {
            EndOfLine::Lf => normalized,
            EndOfLine::CrLf => normalized.replace('\n', "\r\n"),
        };
        if converted != text {
            self.rope = Rope::from_str(&converted);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;
