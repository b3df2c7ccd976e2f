//! Newline-delimited JSON codec for the sync envelope.

use quizsync_model::SyncData;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Upper bound on a single wire message.
///
/// A question bank serializes to a few megabytes at the extreme end;
/// anything past this is a broken or hostile peer, not a bigger bank.
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors in the wire exchange.
#[derive(Error, Debug)]
pub enum WireError {
    /// Socket read or write failed.
    #[error("wire I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection before a full line arrived.
    #[error("peer closed the connection before sending a complete message")]
    UnexpectedEof,

    /// The line was not a valid sync payload.
    #[error("malformed sync payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The peer sent more than [`MAX_MESSAGE_BYTES`] without a newline.
    #[error("sync payload exceeds {MAX_MESSAGE_BYTES} bytes")]
    TooLarge,
}

/// Writes one sync envelope as a single newline-terminated JSON line
/// and flushes.
pub fn write_message<W: Write>(writer: &mut W, data: &SyncData) -> WireResult<()> {
    let mut line = serde_json::to_vec(data)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Reads one newline-terminated JSON line and parses it.
///
/// EOF before any newline is [`WireError::UnexpectedEof`]; the caller
/// must not have persisted anything at that point.
pub fn read_message<R: BufRead>(reader: &mut R) -> WireResult<SyncData> {
    let mut line = Vec::new();
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Err(WireError::UnexpectedEof);
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                line.extend_from_slice(&available[..newline]);
                reader.consume(newline + 1);
                break;
            }
            None => {
                line.extend_from_slice(available);
                let used = available.len();
                reader.consume(used);
                if line.len() > MAX_MESSAGE_BYTES {
                    return Err(WireError::TooLarge);
                }
            }
        }
    }
    if line.len() > MAX_MESSAGE_BYTES {
        return Err(WireError::TooLarge);
    }
    Ok(serde_json::from_slice(&line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizsync_model::{ExamHistoryEntry, Subject};
    use std::io::BufReader;

    fn sample() -> SyncData {
        let mut subject = Subject::new("s1", "Networking");
        subject.endless_best_streak = 4;
        let mut entry = ExamHistoryEntry::new("s1", "Networking");
        entry.timestamp = 1000;
        entry.device_source = "phone".into();
        SyncData::new(vec![subject], vec![entry])
    }

    #[test]
    fn round_trip() {
        let data = sample();
        let mut buf = Vec::new();
        write_message(&mut buf, &data).unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
        // Exactly one line per message.
        assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 1);

        let parsed = read_message(&mut BufReader::new(buf.as_slice())).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn empty_envelope_round_trips() {
        let mut buf = Vec::new();
        write_message(&mut buf, &SyncData::default()).unwrap();
        let parsed = read_message(&mut BufReader::new(buf.as_slice())).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn eof_before_newline() {
        let result = read_message(&mut BufReader::new(&b""[..]));
        assert!(matches!(result, Err(WireError::UnexpectedEof)));

        let result = read_message(&mut BufReader::new(&b"{\"subjects\":[]"[..]));
        assert!(matches!(result, Err(WireError::UnexpectedEof)));
    }

    #[test]
    fn malformed_payload() {
        let result = read_message(&mut BufReader::new(&b"not json\n"[..]));
        assert!(matches!(result, Err(WireError::Malformed(_))));
    }

    #[test]
    fn trailing_bytes_left_for_next_read() {
        let mut buf = Vec::new();
        write_message(&mut buf, &SyncData::default()).unwrap();
        buf.extend_from_slice(b"leftover");

        let mut reader = BufReader::new(buf.as_slice());
        read_message(&mut reader).unwrap();
        let mut rest = Vec::new();
        std::io::Read::read_to_end(&mut reader, &mut rest).unwrap();
        assert_eq!(rest, b"leftover");
    }
}
