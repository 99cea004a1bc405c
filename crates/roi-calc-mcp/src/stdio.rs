use std::io::{self, BufRead, Read, Write};

use tracing::warn;

use crate::protocol::JsonRpcResponse;

/// Largest request body accepted in either framing.
pub(crate) const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// How a request arrived; the reply is written the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StdioFrame {
    LineDelimited,
    ContentLength,
}

impl StdioFrame {
    pub(crate) fn write<W: Write>(self, writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
        let body = serde_json::to_vec(response)?;
        match self {
            Self::LineDelimited => {
                writer.write_all(&body)?;
                writer.write_all(b"\n")?;
            }
            Self::ContentLength => {
                write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
                writer.write_all(&body)?;
            }
        }
        writer.flush()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Inbound {
    Message { body: Vec<u8>, frame: StdioFrame },
    /// Broken framing. The reader has already skipped past it.
    Rejected { reason: String, frame: StdioFrame },
}

/// Splits an input stream into request bodies. A message is either one JSON
/// line or a header block carrying `Content-Length` followed by that many
/// bytes.
pub(crate) struct FrameReader<R> {
    inner: R,
    line: Vec<u8>,
}

impl<R: BufRead> FrameReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
        }
    }

    /// `Ok(None)` once input is exhausted. Only failures of the underlying
    /// reader surface as `Err`; malformed input comes back as
    /// [`Inbound::Rejected`].
    pub(crate) fn next_message(&mut self) -> io::Result<Option<Inbound>> {
        loop {
            match self.fill_line()? {
                None => return Ok(None),
                Some(false) => {
                    return Ok(Some(rejected(
                        StdioFrame::LineDelimited,
                        format!("line exceeds {MAX_FRAME_BYTES} bytes"),
                    )))
                }
                Some(true) => {}
            }
            let text = self.line.trim_ascii();
            if text.is_empty() {
                continue;
            }
            if !is_header_line(text) {
                return Ok(Some(Inbound::Message {
                    body: text.to_vec(),
                    frame: StdioFrame::LineDelimited,
                }));
            }
            let declared = parse_content_length(text);
            return self.read_framed(declared).map(Some);
        }
    }

    /// Reads the rest of a header block and its body. `declared` is the
    /// length found on the first header line, if any.
    fn read_framed(&mut self, mut declared: Option<usize>) -> io::Result<Inbound> {
        loop {
            if self.fill_line()?.is_none() {
                return Ok(rejected(
                    StdioFrame::ContentLength,
                    "unexpected eof while reading frame headers".to_string(),
                ));
            }
            let header = self.line.trim_ascii();
            if header.is_empty() {
                break;
            }
            if let Some(len) = parse_content_length(header) {
                declared = Some(len);
            }
        }

        let Some(len) = declared else {
            return Ok(rejected(
                StdioFrame::ContentLength,
                "missing content-length header".to_string(),
            ));
        };
        let wanted = u64::try_from(len).unwrap_or(u64::MAX);
        if len > MAX_FRAME_BYTES {
            io::copy(&mut (&mut self.inner).take(wanted), &mut io::sink())?;
            return Ok(rejected(
                StdioFrame::ContentLength,
                format!("content-length {len} exceeds {MAX_FRAME_BYTES} bytes"),
            ));
        }

        let mut body = Vec::with_capacity(len);
        (&mut self.inner).take(wanted).read_to_end(&mut body)?;
        if body.len() < len {
            return Ok(rejected(
                StdioFrame::ContentLength,
                format!("body ended after {} of {len} bytes", body.len()),
            ));
        }
        Ok(Inbound::Message {
            body,
            frame: StdioFrame::ContentLength,
        })
    }

    /// Loads the next line into `self.line`. `None` at end of input,
    /// `Some(false)` when the line ran past the size limit; the remainder of
    /// an over-long line is discarded.
    fn fill_line(&mut self) -> io::Result<Option<bool>> {
        self.line.clear();
        let cap = u64::try_from(MAX_FRAME_BYTES).map_or(u64::MAX, |n| n.saturating_add(1));
        if (&mut self.inner).take(cap).read_until(b'\n', &mut self.line)? == 0 {
            return Ok(None);
        }
        if self.line.len() > MAX_FRAME_BYTES && self.line.last() != Some(&b'\n') {
            self.skip_rest_of_line()?;
            return Ok(Some(false));
        }
        Ok(Some(true))
    }

    fn skip_rest_of_line(&mut self) -> io::Result<()> {
        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            let (used, found) = match buf.iter().position(|b| *b == b'\n') {
                Some(at) => (at + 1, true),
                None => (buf.len(), false),
            };
            self.inner.consume(used);
            if found {
                return Ok(());
            }
        }
    }
}

fn rejected(frame: StdioFrame, reason: String) -> Inbound {
    warn!(?frame, %reason, "rejected stdio frame");
    Inbound::Rejected { reason, frame }
}

fn is_header_line(line: &[u8]) -> bool {
    [b"content-length:".as_slice(), b"content-type:"]
        .iter()
        .any(|prefix| {
            line.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
}

fn parse_content_length(line: &[u8]) -> Option<usize> {
    let mut parts = line.splitn(2, |b| *b == b':');
    let name = parts.next()?;
    let value = parts.next()?;
    if !name.trim_ascii().eq_ignore_ascii_case(b"content-length") {
        return None;
    }
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}
