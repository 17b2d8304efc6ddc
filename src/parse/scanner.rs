use super::error;

/// Cursor over the raw bytes of a legacy file
///
/// Legacy files mix line oriented ASCII headers with either whitespace separated ASCII
/// values or raw big endian binary blocks, so the scanner works on bytes and only
/// converts to `str` where text is expected.
pub(crate) struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            line: 1,
        }
    }

    /// current (1-based) line number, only meaningful in ASCII sections
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.bytes.len()
    }

    /// whether any bytes are left, without skipping whitespace
    pub(crate) fn has_remaining(&self) -> bool {
        self.pos < self.bytes.len()
    }

    /// number of bytes not yet consumed
    pub(crate) fn remaining_len(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.bytes.get(self.pos) {
            if !byte.is_ascii_whitespace() {
                break;
            }
            if *byte == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    /// the next whitespace separated token, crossing line boundaries
    pub(crate) fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let start = self.pos;

        while let Some(byte) = self.bytes.get(self.pos) {
            if byte.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }

        if start == self.pos {
            None
        } else {
            std::str::from_utf8(&self.bytes[start..self.pos]).ok()
        }
    }

    /// look at the next token without consuming it
    pub(crate) fn peek_token(&mut self) -> Option<&'a str> {
        let (pos, line) = (self.pos, self.line);
        let token = self.next_token();
        self.pos = pos;
        self.line = line;
        token
    }

    /// everything up to the end of the current line. The newline is consumed, so binary
    /// data that follows starts at the cursor
    pub(crate) fn rest_of_line(&mut self) -> Result<&'a str, error::NotUtf8> {
        let start = self.pos;

        while let Some(byte) = self.bytes.get(self.pos) {
            self.pos += 1;
            if *byte == b'\n' {
                self.line += 1;
                let line = &self.bytes[start..self.pos - 1];
                return to_str(line, self.line - 1);
            }
        }

        to_str(&self.bytes[start..self.pos], self.line)
    }

    /// the next line containing anything other than whitespace, trimmed
    pub(crate) fn next_nonempty_line(&mut self) -> Result<Option<&'a str>, error::NotUtf8> {
        while self.pos < self.bytes.len() {
            let line = self.rest_of_line()?.trim();
            if !line.is_empty() {
                return Ok(Some(line));
            }
        }

        Ok(None)
    }

    /// consume `count` raw bytes
    pub(crate) fn take(&mut self, count: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(count)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }
}

fn to_str(bytes: &[u8], line: usize) -> Result<&str, error::NotUtf8> {
    let text = std::str::from_utf8(bytes).map_err(|_| error::NotUtf8::new(line))?;
    Ok(text.trim_end_matches('\r'))
}
