use std::io::{self, Read};

use crate::request::classify::ReadSignals;

/// Reader that fails once more than `limit` bytes have been pulled from `inner`.
///
/// It also remembers whether anything other than whitespace went past, so an
/// empty body can be told apart from a truncated one.
#[derive(Debug)]
pub struct LimitedReader<R> {
    inner: R,
    limit: u64,
    remaining: u64,
    exceeded: bool,
    saw_content: bool,
}

impl<R: Read> LimitedReader<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            remaining: limit,
            exceeded: false,
            saw_content: false,
        }
    }

    pub fn exceeded(&self) -> bool {
        self.exceeded
    }

    pub fn saw_content(&self) -> bool {
        self.saw_content
    }

    pub fn signals(&self) -> ReadSignals {
        ReadSignals {
            limit: self.limit,
            exceeded: self.exceeded,
            saw_content: self.saw_content,
        }
    }
}

fn limit_error(limit: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("body exceeds {} bytes", limit),
    )
}

impl<R: Read> Read for LimitedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.exceeded {
            return Err(limit_error(self.limit));
        }
        if buf.is_empty() {
            return Ok(0);
        }

        // One byte past the limit is enough to know it was crossed
        let window = self.remaining.saturating_add(1).min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..window])?;
        if n as u64 > self.remaining {
            self.exceeded = true;
            return Err(limit_error(self.limit));
        }

        self.remaining -= n as u64;
        if !self.saw_content && buf[..n].iter().any(|b| !b.is_ascii_whitespace()) {
            self.saw_content = true;
        }
        Ok(n)
    }
}
