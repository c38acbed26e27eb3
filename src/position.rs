/*
    This module tracks where in the source a byte offset lives
*/

use std::fmt::Display;

// A location in the source. The zero value is the invalid position.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Position {
    // Byte offset, starting at 0
    pub offset: usize,
    // Line number, starting at 1
    pub line: usize,
    // Byte count within the line, starting at 1
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Position { offset, line, column }
    }

    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "-")
        }
    }
}

// Turns byte offsets into line/column pairs as runes are consumed.
//
// `advance` has to be called exactly once per consumed rune, in order. A
// newline bumps the line counter so that the rune after it starts column 1.
#[derive(Debug, Clone)]
pub struct LineTracker {
    line: usize,
    line_offset: usize,
}

impl Default for LineTracker {
    fn default() -> Self {
        LineTracker { line: 1, line_offset: 0 }
    }
}

impl LineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // `offset` is where the rune after `ch` starts
    pub fn advance(&mut self, ch: char, offset: usize) {
        if ch == '\n' {
            self.line += 1;
            self.line_offset = offset;
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        Position::new(offset, self.line, offset - self.line_offset + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_position() {
        assert_eq!(Position::new(0, 1, 1).to_string(), "1:1");
        assert_eq!(Position::new(14, 3, 7).to_string(), "3:7");
        assert_eq!(Position::default().to_string(), "-");
        assert!(!Position::default().is_valid());
    }

    #[test]
    fn track_lines() {
        let text = "ab\nc\n\nd";
        let mut tracker = LineTracker::new();
        let mut positions = Vec::new();

        for (offset, ch) in text.char_indices() {
            positions.push(tracker.position(offset));
            tracker.advance(ch, offset + ch.len_utf8());
        }

        assert_eq!(positions, vec![
            Position::new(0, 1, 1),
            Position::new(1, 1, 2),
            Position::new(2, 1, 3),
            Position::new(3, 2, 1),
            Position::new(4, 2, 2),
            Position::new(5, 3, 1),
            Position::new(6, 4, 1),
        ]);
    }

    #[test]
    fn column_counts_bytes() {
        let text = "éa";
        let mut tracker = LineTracker::new();
        let mut chars = text.char_indices();

        let (offset, ch) = chars.next().unwrap();
        tracker.advance(ch, offset + ch.len_utf8());
        let (offset, _) = chars.next().unwrap();

        assert_eq!(tracker.position(offset), Position::new(2, 1, 3));
    }
}
