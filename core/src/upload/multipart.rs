use std::io::{self, Read};

use crate::errors::ToolkitError;

const CHUNK_LEN: usize = 8 * 1024;
const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Headers of one entry of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartHeaders {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl PartHeaders {
    /// A part is a file part when it carries a non-empty `filename` parameter.
    pub fn is_file(&self) -> bool {
        self.filename.as_deref().map_or(false, |f| !f.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Preamble,
    AtDelimiter,
    InBody,
    Done,
}

/// Streaming reader for multipart/form-data content.
///
/// Parts come out in body order through [`MultipartReader::next_part`]; the
/// current part's bytes are read through [`MultipartReader::part_body`]. Only
/// a small window of the body is held in memory at any time.
#[derive(Debug)]
pub struct MultipartReader<R> {
    reader: R,
    boundary: String,
    separator: Vec<u8>,
    buf: Vec<u8>,
    state: State,
    failure: Option<ToolkitError>,
}

impl<R: Read> MultipartReader<R> {
    pub fn new(boundary: impl Into<String>, reader: R) -> Self {
        let boundary = boundary.into();
        let mut separator = b"\r\n--".to_vec();
        separator.extend_from_slice(boundary.as_bytes());

        MultipartReader {
            reader,
            boundary,
            separator,
            // A delimiter at the very start of the body has no line break before it
            buf: b"\r\n".to_vec(),
            state: State::Preamble,
            failure: None,
        }
    }

    /// Builds a reader from a request `Content-Type` header value.
    pub fn from_content_type(content_type: &str, reader: R) -> Result<Self, ToolkitError> {
        let mut pieces = content_type.split(';');
        let media_type = pieces.next().unwrap_or_default().trim();
        if !media_type.eq_ignore_ascii_case("multipart/form-data") {
            return Err(invalid(format!(
                "expected multipart/form-data, got '{}'",
                media_type
            )));
        }

        let boundary = pieces
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
            .map(|(_, value)| unquote(value.trim()))
            .unwrap_or_default();

        if boundary.is_empty() {
            return Err(invalid("missing boundary parameter"));
        }

        Ok(Self::new(boundary, reader))
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Advances to the next part, skipping whatever is left of the current one.
    pub fn next_part(&mut self) -> Result<Option<PartHeaders>, ToolkitError> {
        match self.state {
            State::Done => return Ok(None),
            State::Preamble => self.skip_preamble()?,
            State::InBody => {
                let mut scratch = [0u8; 1024];
                while self.read_body(&mut scratch)? > 0 {}
            }
            State::AtDelimiter => {}
        }

        self.ensure(2)?;
        if self.buf.starts_with(b"--") {
            self.state = State::Done;
            return Ok(None);
        }
        self.skip_line_end()?;

        let headers = self.read_headers()?;
        let part = build_part(headers)?;
        self.state = State::InBody;
        Ok(Some(part))
    }

    /// Up to `n` leading bytes of the current part, without consuming them.
    pub fn peek_body(&mut self, n: usize) -> Result<&[u8], ToolkitError> {
        if self.state != State::InBody {
            return Ok(&[]);
        }
        loop {
            if let Some(i) = find(&self.buf, &self.separator, 0) {
                return Ok(&self.buf[..i.min(n)]);
            }
            if self.buf.len() >= n + self.separator.len() {
                return Ok(&self.buf[..n]);
            }
            if !self.fill()? {
                return Err(invalid("missing closing boundary"));
            }
        }
    }

    /// `Read` over the rest of the current part's bytes.
    pub fn part_body(&mut self) -> PartBody<'_, R> {
        PartBody { parts: self }
    }

    /// The parse or read failure behind the last `io::Error` from a [`PartBody`].
    pub fn take_failure(&mut self) -> Option<ToolkitError> {
        self.failure.take()
    }

    fn read_body(&mut self, out: &mut [u8]) -> Result<usize, ToolkitError> {
        if self.state != State::InBody || out.is_empty() {
            return Ok(0);
        }
        loop {
            if let Some(i) = find(&self.buf, &self.separator, 0) {
                if i == 0 {
                    self.buf.drain(..self.separator.len());
                    self.state = State::AtDelimiter;
                    return Ok(0);
                }
                return Ok(self.take_front(out, i));
            }

            // The tail could be the start of a separator split across reads
            let settled = self.buf.len().saturating_sub(self.separator.len() - 1);
            if settled > 0 {
                return Ok(self.take_front(out, settled));
            }
            if !self.fill()? {
                return Err(invalid("missing closing boundary"));
            }
        }
    }

    fn take_front(&mut self, out: &mut [u8], available: usize) -> usize {
        let n = available.min(out.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        self.buf.drain(..n);
        n
    }

    fn skip_preamble(&mut self) -> Result<(), ToolkitError> {
        loop {
            if let Some(i) = find(&self.buf, &self.separator, 0) {
                self.buf.drain(..i + self.separator.len());
                self.state = State::AtDelimiter;
                return Ok(());
            }
            let discard = self.buf.len().saturating_sub(self.separator.len() - 1);
            self.buf.drain(..discard);
            if !self.fill()? {
                return Err(invalid("missing opening boundary"));
            }
        }
    }

    /// Skips transport padding and the line break that follows a delimiter.
    fn skip_line_end(&mut self) -> Result<(), ToolkitError> {
        loop {
            if self.buf.is_empty() && !self.fill()? {
                return Err(invalid("missing closing boundary"));
            }
            match self.buf[0] {
                b' ' | b'\t' => {
                    self.buf.remove(0);
                }
                _ => break,
            }
        }

        self.ensure(2)?;
        if self.buf.starts_with(b"\r\n") {
            self.buf.drain(..2);
            Ok(())
        } else if self.buf.starts_with(b"\n") {
            self.buf.drain(..1);
            Ok(())
        } else {
            Err(invalid("malformed boundary line"))
        }
    }

    /// Returns the lower-cased headers of the part and leaves the buffer at its body.
    fn read_headers(&mut self) -> Result<Vec<(String, String)>, ToolkitError> {
        self.ensure(2)?;
        if self.buf.starts_with(b"\r\n") {
            self.buf.drain(..2);
            return Ok(Vec::new());
        }

        let header_end = loop {
            if let Some(i) = find(&self.buf, b"\r\n\r\n", 0) {
                break i;
            }
            if self.buf.len() > MAX_HEADER_BYTES {
                return Err(invalid("part headers too large"));
            }
            if !self.fill()? {
                return Err(invalid("unterminated part headers"));
            }
        };

        let headers = std::str::from_utf8(&self.buf[..header_end])
            .map_err(|_| invalid("invalid UTF-8 in part headers"))?
            .split("\r\n")
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        self.buf.drain(..header_end + 4);
        Ok(headers)
    }

    /// Fills the buffer until it holds `n` bytes or the body ends.
    fn ensure(&mut self, n: usize) -> Result<(), ToolkitError> {
        while self.buf.len() < n && self.fill()? {}
        Ok(())
    }

    /// Appends one chunk from the underlying reader; `false` at end of body.
    fn fill(&mut self) -> Result<bool, ToolkitError> {
        let start = self.buf.len();
        self.buf.resize(start + CHUNK_LEN, 0);
        let read = loop {
            match self.reader.read(&mut self.buf[start..]) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match read {
            Ok(n) => {
                self.buf.truncate(start + n);
                Ok(n > 0)
            }
            Err(e) => {
                self.buf.truncate(start);
                Err(ToolkitError::Io(e))
            }
        }
    }
}

/// Body of the current part. Ends at the next delimiter.
pub struct PartBody<'a, R> {
    parts: &'a mut MultipartReader<R>,
}

impl<R: Read> Read for PartBody<'_, R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        self.parts.read_body(out).map_err(|e| {
            let err = io::Error::new(io::ErrorKind::InvalidData, e.to_string());
            self.parts.failure = Some(e);
            err
        })
    }
}

fn build_part(headers: Vec<(String, String)>) -> Result<PartHeaders, ToolkitError> {
    let header = |wanted: &str| {
        headers
            .iter()
            .find(|(name, _)| name == wanted)
            .map(|(_, value)| value.as_str())
    };

    let disposition = header("content-disposition")
        .ok_or_else(|| invalid("part without Content-Disposition header"))?;
    let (name, filename) = parse_content_disposition(disposition)?;

    Ok(PartHeaders {
        name,
        filename,
        content_type: header("content-type").map(str::to_string),
    })
}

/// Extracts `name` and the base name of `filename` from a Content-Disposition value.
fn parse_content_disposition(value: &str) -> Result<(String, Option<String>), ToolkitError> {
    let mut name = None;
    let mut filename = None;

    for param in split_params(value).into_iter().skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.eq_ignore_ascii_case("name") {
            name = Some(unquote(raw.trim()));
        } else if key.eq_ignore_ascii_case("filename") {
            filename = Some(submitted_file_name(&unquote(raw.trim()))?);
        }
    }

    let name = name.ok_or_else(|| invalid("missing name in Content-Disposition"))?;
    Ok((name, filename))
}

/// Base name of a submitted filename. An empty name (a file input left blank)
/// stays empty; a non-empty name must leave a usable base name.
fn submitted_file_name(raw: &str) -> Result<String, ToolkitError> {
    if raw.is_empty() {
        return Ok(String::new());
    }
    match base_name(raw) {
        "" | "." | ".." => Err(invalid(format!("unusable filename '{}'", raw))),
        base => Ok(base.to_string()),
    }
}

/// Splits on `;` outside of quoted strings.
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let mut out = String::with_capacity(value.len() - 2);
        let mut chars = value[1..value.len() - 1].chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    } else {
        value.to_string()
    }
}

/// Final path component, so a submitted name can never address a parent directory.
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|i| i + from)
}

fn invalid(reason: impl Into<String>) -> ToolkitError {
    ToolkitError::InvalidMultipart {
        reason: reason.into(),
    }
}
