use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    InvalidPayload,
}

/// A type for reading server-sent events from a chunk stream.
pub struct Sse {
    buf: String,
    pending_bytes: Vec<u8>,
    chunks: Chunks,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: String::new(),
            pending_bytes: Vec::new(),
            chunks,
        }
    }

    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            // Events already buffered are returned before reading more.
            if let Some(event) = self.try_parse_event()? {
                return Ok(Some(event));
            }

            let Some(bytes) =
                self.chunks.next_chunk().await.map_err(Error::ChunksError)?
            else {
                // Trailing bytes without a blank line are not an event.
                return Ok(None);
            };
            self.push_bytes(&bytes)?;
        }
    }

    /// Appends bytes to the buffer, holding back an incomplete UTF-8
    /// sequence at the end of the chunk.
    fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.pending_bytes.extend_from_slice(bytes);
        let valid_len = match str::from_utf8(&self.pending_bytes) {
            Ok(_) => self.pending_bytes.len(),
            Err(err) if err.error_len().is_none() => err.valid_up_to(),
            Err(_) => return Err(Error::InvalidPayload),
        };
        let rest = self.pending_bytes.split_off(valid_len);
        let Ok(s) = str::from_utf8(&self.pending_bytes) else {
            return Err(Error::InvalidPayload);
        };
        self.buf.push_str(s);
        self.pending_bytes = rest;
        Ok(())
    }

    fn try_parse_event(&mut self) -> Result<Option<String>, Error> {
        // An event ends with a blank line. Gemini terminates lines with
        // CRLF, other servers with LF only.
        //
        // event         = *( comment / field ) end-of-line
        // comment       = colon *any-char end-of-line
        // field         = 1*name-char [ colon [ space ] *any-char ] end-of-line
        while let Some((end_idx, sep_len)) = find_event_end(&self.buf) {
            let mut data: Option<String> = None;
            for line in self.buf[0..end_idx].lines() {
                if line.is_empty() || line.starts_with(':') {
                    continue;
                }
                let Some((name, value)) = line.split_once(':') else {
                    return Err(Error::InvalidPayload);
                };
                if name != "data" {
                    // `event`, `id` and `retry` carry nothing for us.
                    continue;
                }
                let value = value.strip_prefix(' ').unwrap_or(value);
                match &mut data {
                    Some(data) => {
                        data.push('\n');
                        data.push_str(value);
                    }
                    None => data = Some(value.to_owned()),
                }
            }

            // Consume the bytes from the buffer.
            self.buf.drain(0..end_idx + sep_len);

            // Keep-alive comments have no data, skip them.
            if data.is_some() {
                return Ok(data);
            }
        }
        Ok(None)
    }
}

fn find_event_end(buf: &str) -> Option<(usize, usize)> {
    let lf = buf.find("\n\n").map(|idx| (idx, 2));
    let crlf = buf.find("\r\n\r\n").map(|idx| (idx, 4));
    match (lf, crlf) {
        (Some(lf), Some(crlf)) => Some(if lf.0 < crlf.0 { lf } else { crlf }),
        (lf, crlf) => lf.or(crlf),
    }
}
