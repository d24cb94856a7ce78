//! Character cursor for traversing source text.
//!
//! Maintains position, line and column state while scanning. Handles UTF-8
//! correctly (an Arma config can carry non-ASCII text inside string
//! literals) while keeping an ASCII fast path for the structural characters
//! the lexer spends most of its time on.

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct CursorSnapshot {
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    #[inline]
    pub fn char_at(&self, offset: usize) -> char {
        let pos = self.position + offset;
        if pos >= self.source.len() {
            return '\0';
        }
        let b = self.source.as_bytes()[pos];
        if b < 128 {
            return b as char;
        }
        self.source[pos..].chars().next().unwrap_or('\0')
    }

    #[inline]
    pub fn peek_char(&self, offset: usize) -> char {
        self.char_at(offset)
    }

    /// Peeks the next `n` characters as a `String`, for directive-keyword
    /// lookahead after `#` (keywords are up to 7 characters: `#include`).
    /// Does not consume; characters are walked rather than byte-sliced since
    /// they may be multi-byte.
    pub fn peek_str(&self, n: usize) -> String {
        let mut result = String::with_capacity(n);
        let mut iter = self.source[self.position.min(self.source.len())..].chars();
        for _ in 0..n {
            match iter.next() {
                Some(c) => result.push(c),
                None => break,
            }
        }
        result
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.position >= self.source.len() {
            return;
        }
        let b = self.source.as_bytes()[self.position];
        if b < 128 {
            self.position += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            return;
        }
        if let Some(c) = self.source[self.position..].chars().next() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn advance_n(&mut self, count: usize) {
        for _ in 0..count {
            if self.is_at_end() {
                break;
            }
            self.advance();
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.position = snapshot.position;
        self.line = snapshot.line;
        self.column = snapshot.column;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_line_and_column() {
        let mut cursor = Cursor::new("ab\ncd");
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        cursor.advance_n(3);
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 2));
    }

    #[test]
    fn peek_str_reads_ahead_without_consuming() {
        let cursor = Cursor::new("#include");
        assert_eq!(cursor.peek_str(8), "#include");
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn peek_str_short_input_truncates() {
        let cursor = Cursor::new("#if");
        assert_eq!(cursor.peek_str(7), "#if");
    }

    #[test]
    fn snapshot_restore_roundtrips() {
        let mut cursor = Cursor::new("let x");
        let snap = cursor.snapshot();
        cursor.advance_n(3);
        cursor.restore(snap);
        assert_eq!(cursor.current_char(), 'l');
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn handles_utf8_multibyte() {
        let mut cursor = Cursor::new("caf\u{e9}!");
        cursor.advance_n(3);
        assert_eq!(cursor.current_char(), '\u{e9}');
        cursor.advance();
        assert_eq!(cursor.current_char(), '!');
    }
}
