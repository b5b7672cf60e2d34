//! Source — a line reader with single-line pushback.
//!
//! The block extractor decides a block has ended only after reading one line
//! too many; `put` hands that line back so the next read re-delivers it.

use std::io::{self, BufRead, Lines};

pub struct PushbackLines<B> {
    lines: Lines<B>,
    pending: Option<String>,
}

impl<B: BufRead> PushbackLines<B> {
    pub fn new(reader: B) -> Self {
        Self {
            lines: reader.lines(),
            pending: None,
        }
    }

    /// Buffer `line` to be returned by the next read. At most one line is
    /// held; an unread previous line is dropped (last write wins). Callers
    /// are expected to read between puts.
    pub fn put(&mut self, line: String) {
        self.pending = Some(line);
    }
}

impl<B: BufRead> Iterator for PushbackLines<B> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pending.take() {
            Some(line) => Some(Ok(line)),
            None => self.lines.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(text: &str) -> PushbackLines<Cursor<&str>> {
        PushbackLines::new(Cursor::new(text))
    }

    #[test]
    fn test_pushback_round_trip() {
        let mut src = source("line1\nline2\nline3\n");

        assert_eq!(src.next().unwrap().unwrap(), "line1");
        src.put("newline".to_string());
        assert_eq!(src.next().unwrap().unwrap(), "newline");
        assert_eq!(src.next().unwrap().unwrap(), "line2");
        src.put("NEWLINE".to_string());
        assert_eq!(src.next().unwrap().unwrap(), "NEWLINE");
        assert_eq!(src.next().unwrap().unwrap(), "line3");
        assert!(src.next().is_none());
    }

    #[test]
    fn test_double_put_last_write_wins() {
        let mut src = source("line1\n");
        src.put("first".to_string());
        src.put("second".to_string());
        assert_eq!(src.next().unwrap().unwrap(), "second");
        assert_eq!(src.next().unwrap().unwrap(), "line1");
    }

    #[test]
    fn test_put_after_exhaustion() {
        let mut src = source("only\n");
        assert_eq!(src.next().unwrap().unwrap(), "only");
        assert!(src.next().is_none());
        src.put("late".to_string());
        assert_eq!(src.next().unwrap().unwrap(), "late");
        assert!(src.next().is_none());
    }
}
