//! Incremental decoding of the contact list stream.
//!
//! The list endpoint writes one JSON contact per line. Network frames do not
//! respect line boundaries, so the decoder buffers partial lines between
//! calls and only parses a line once its `\n` has arrived.

use contacts_common::{Contact, Error, Result};

/// Buffers NDJSON chunks and yields complete contacts.
///
/// # Example
/// ```
/// use contacts_client::ContactStreamDecoder;
///
/// let mut decoder = ContactStreamDecoder::new();
/// assert!(decoder.push(br#"{"name":"Paul","sur"#).unwrap().is_empty());
///
/// let contacts = decoder.push(b"name\":\"Appleseed\",\"id\":1}\n").unwrap();
/// assert_eq!(contacts[0].surname, "Appleseed");
/// assert!(decoder.finish().unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct ContactStreamDecoder {
    buffer: Vec<u8>,
    decoded: usize,
}

impl ContactStreamDecoder {
    /// Creates a decoder with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every contact completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Contact>> {
        self.buffer.extend_from_slice(chunk);

        let mut contacts = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(contact) = self.decode_line(&line[..newline])? {
                contacts.push(contact);
            }
        }
        Ok(contacts)
    }

    /// Ends the stream.
    ///
    /// A final record without a trailing newline is accepted if it parses;
    /// anything else left in the buffer means the stream was cut short.
    pub fn finish(mut self) -> Result<Option<Contact>> {
        let rest = std::mem::take(&mut self.buffer);
        self.decode_line(&rest)
    }

    fn decode_line(&mut self, line: &[u8]) -> Result<Option<Contact>> {
        if line.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let contact = serde_json::from_slice(line).map_err(|e| {
            Error::protocol(format!(
                "Malformed contact after {} records: {}",
                self.decoded, e
            ))
        })?;
        self.decoded += 1;
        Ok(Some(contact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_lines_split_across_chunks() {
        let mut decoder = ContactStreamDecoder::new();

        let first = decoder
            .push(b"{\"id\":1,\"name\":\"A\",\"surname\":\"B\"}\n{\"id\":2,")
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "A");

        let second = decoder
            .push(b"\"name\":\"C\",\"surname\":\"D\",\"emails\":[\"c@d.e\"]}\n")
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].emails, vec!["c@d.e"]);

        assert!(decoder.finish().unwrap().is_none());
    }

    #[test]
    fn test_skips_blank_lines() {
        let mut decoder = ContactStreamDecoder::new();
        let contacts = decoder
            .push(b"\n\r\n{\"name\":\"A\",\"surname\":\"B\"}\r\n\n")
            .unwrap();

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].surname, "B");
    }

    #[test]
    fn test_empty_stream() {
        let decoder = ContactStreamDecoder::new();
        assert!(decoder.finish().unwrap().is_none());
    }

    #[test]
    fn test_final_record_without_newline() {
        let mut decoder = ContactStreamDecoder::new();
        assert!(decoder.push(b"{\"name\":\"A\",\"surname\":\"B\"}").unwrap().is_empty());

        let last = decoder.finish().unwrap().unwrap();
        assert_eq!(last.name, "A");
    }

    #[test]
    fn test_truncated_record_is_an_error() {
        let mut decoder = ContactStreamDecoder::new();
        decoder.push(b"{\"name\":\"A\",\"surname\":\"B\"}\n{\"name\":").unwrap();

        match decoder.finish() {
            Err(Error::Protocol(msg)) => assert!(msg.contains("after 1 records")),
            other => panic!("Expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_line_is_an_error() {
        let mut decoder = ContactStreamDecoder::new();
        assert!(decoder.push(b"not json\n").is_err());
    }
}
