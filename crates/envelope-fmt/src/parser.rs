//! Envelope scanning and segment splitting.
//!
//! Parsing never fails: scripts are untrusted on-chain data, so anything
//! malformed truncates the segment list and everything read so far is still
//! returned.

use bitcoin::Script;
use bitcoin::opcodes::all::{OP_PUSHBYTES_1, OP_RETURN};

use crate::PIPE_BYTE;
use crate::ops::read_op;
use crate::types::{Envelope, SegmentRef};

/// Finds the start position of the first `OP_RETURN` operation at or after
/// `from`, scanning one operation at a time.
pub fn find_return(buf: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while pos < buf.len() {
        let start = pos;
        match read_op(buf, &mut pos) {
            Ok(op) if op.opcode == OP_RETURN => return Some(start),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    None
}

/// Finds the start position of the first pipe token at or after `from`.
///
/// A pipe token is exactly a one-byte data push of [`PIPE_BYTE`]; a literal
/// `|` inside a longer push is not a delimiter.
pub fn find_pipe(buf: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    while pos < buf.len() {
        let start = pos;
        match read_op(buf, &mut pos) {
            Ok(op) if op.opcode == OP_PUSHBYTES_1 && op.data == [PIPE_BYTE] => {
                return Some(start);
            }
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    None
}

/// Decodes an envelope from a script.
pub fn parse_envelope(script: &Script) -> Envelope<'_> {
    parse_envelope_bytes(script.as_bytes())
}

/// Decodes an envelope from raw script bytes.
///
/// A buffer without `OP_RETURN` yields an envelope with zero segments, not
/// an error. A segment whose protocol-id push cannot be read truncates the
/// segment list.
pub fn parse_envelope_bytes(buf: &[u8]) -> Envelope<'_> {
    let Some(ret) = find_return(buf, 0) else {
        return Envelope::new(&[], Vec::new());
    };

    let prefix = &buf[..ret];
    let mut segments = Vec::new();
    let mut pos = ret + 1;

    loop {
        let pipe = find_pipe(buf, pos);
        let offset = pos;

        let Ok(op) = read_op(buf, &mut pos) else {
            break;
        };
        let protocol = op.data;

        match pipe {
            None => {
                // Final segment: payload runs to the end of the script.
                segments.push(SegmentRef::new(protocol, &buf[pos..], offset));
                break;
            }
            Some(p) => {
                // The protocol-id push itself may have been the pipe; the
                // segment then has an empty payload.
                let end = p.max(pos);
                segments.push(SegmentRef::new(protocol, &buf[pos..end], offset));
                // Skip the pipe push: one length byte plus its payload byte.
                pos = p + 2;
            }
        }
    }

    Envelope::new(prefix, segments)
}
