//! One-based line numbering over a buffered reader.

use std::io::{self, BufRead, Lines};

/// Iterates lines together with their one-based line numbers.
pub(crate) struct NumberedLines<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    /// The next line, blank or not.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<(usize, String)>> {
        match self.lines.next() {
            Some(line) => {
                self.number += 1;
                line.map(|text| Some((self.number, text)))
            }
            None => Ok(None),
        }
    }

    /// The next line containing anything other than whitespace.
    pub(crate) fn next_non_blank(&mut self) -> io::Result<Option<(usize, String)>> {
        while let Some((number, text)) = self.next_line()? {
            if !text.trim().is_empty() {
                return Ok(Some((number, text)));
            }
        }
        Ok(None)
    }
}
