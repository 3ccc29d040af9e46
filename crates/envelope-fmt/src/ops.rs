//! Positional operation cursor over raw script bytes.
//!
//! [`read_op`] reads one operation at an explicit position and advances the
//! position past it, which is what the envelope scanner and every protocol
//! codec are built on. The position is always a per-call value owned by the
//! caller; nothing here holds state between calls.

use bitcoin::Opcode;
use bitcoin::opcodes::all::{OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4};
use bitcoin::script::{PushBytesBuf, ScriptBuf};

use crate::errors::{EnvelopeBuildError, OpReadError};

/// Largest opcode that encodes its own push length directly.
const MAX_DIRECT_PUSH: u8 = 0x4b;

const PUSHDATA1: u8 = OP_PUSHDATA1.to_u8();
const PUSHDATA2: u8 = OP_PUSHDATA2.to_u8();
const PUSHDATA4: u8 = OP_PUSHDATA4.to_u8();

/// A single decoded script operation.
///
/// For data pushes `data` borrows the pushed bytes from the source buffer;
/// for bare opcodes it is empty.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Op<'b> {
    /// The operation's opcode.
    pub opcode: Opcode,

    /// Bytes pushed by the operation, empty for bare opcodes.
    pub data: &'b [u8],
}

/// Reads the operation at `pos`, advancing `pos` past it on success.
///
/// Fails when `pos` is at or beyond the end of the buffer, or when a
/// declared push length would read past it. `pos` is left untouched on
/// failure.
pub fn read_op<'b>(buf: &'b [u8], pos: &mut usize) -> Result<Op<'b>, OpReadError> {
    let mut cur = *pos;
    let opbyte = *buf.get(cur).ok_or(OpReadError::UnexpectedEnd(cur))?;
    let opcode = Opcode::from(opbyte);
    cur += 1;

    let len = match opbyte {
        1..=MAX_DIRECT_PUSH => opbyte as usize,
        PUSHDATA1 => read_push_len(buf, &mut cur, 1)?,
        PUSHDATA2 => read_push_len(buf, &mut cur, 2)?,
        PUSHDATA4 => read_push_len(buf, &mut cur, 4)?,
        _ => {
            *pos = cur;
            return Ok(Op { opcode, data: &[] });
        }
    };

    let data = cur
        .checked_add(len)
        .and_then(|end| buf.get(cur..end))
        .ok_or(OpReadError::PushOverrun {
            wanted: len,
            available: buf.len().saturating_sub(cur),
        })?;
    *pos = cur + len;
    Ok(Op { opcode, data })
}

/// Reads a `width`-byte little-endian push length at `cur`.
fn read_push_len(buf: &[u8], cur: &mut usize, width: usize) -> Result<usize, OpReadError> {
    let bytes = buf
        .get(*cur..*cur + width)
        .ok_or(OpReadError::UnexpectedEnd(buf.len()))?;

    let mut len = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        len |= (*b as usize) << (8 * i);
    }

    *cur += width;
    Ok(len)
}

/// Appends a minimally-encoded data push of `data` to `out`.
pub fn append_push(out: &mut Vec<u8>, data: &[u8]) -> Result<(), EnvelopeBuildError> {
    let bytes = PushBytesBuf::try_from(data.to_vec())?;
    let mut scratch = ScriptBuf::new();
    scratch.push_slice(bytes);
    out.extend_from_slice(scratch.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use bitcoin::opcodes::all::{OP_PUSHBYTES_3, OP_RETURN};

    use super::*;

    #[test]
    fn read_direct_push() {
        let buf = [0x03, b'a', b'b', b'c', 0xff];
        let mut pos = 0;

        let op = read_op(&buf, &mut pos).unwrap();
        assert_eq!(op.opcode, OP_PUSHBYTES_3);
        assert_eq!(op.data, b"abc");
        assert_eq!(pos, 4);
    }

    #[test]
    fn read_bare_opcode() {
        let buf = [OP_RETURN.to_u8()];
        let mut pos = 0;

        let op = read_op(&buf, &mut pos).unwrap();
        assert_eq!(op.opcode, OP_RETURN);
        assert!(op.data.is_empty());
        assert_eq!(pos, 1);
    }

    #[test]
    fn read_pushdata1() {
        let mut buf = vec![PUSHDATA1, 5];
        buf.extend_from_slice(b"hello");
        let mut pos = 0;

        let op = read_op(&buf, &mut pos).unwrap();
        assert_eq!(op.data, b"hello");
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn read_pushdata2_little_endian() {
        let mut buf = vec![PUSHDATA2, 0x00, 0x01];
        buf.extend_from_slice(&[0xaa; 256]);
        let mut pos = 0;

        let op = read_op(&buf, &mut pos).unwrap();
        assert_eq!(op.data.len(), 256);
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn read_at_end_fails_without_advancing() {
        let buf = [0x01, b'x'];
        let mut pos = 2;

        assert!(matches!(
            read_op(&buf, &mut pos),
            Err(OpReadError::UnexpectedEnd(2))
        ));
        assert_eq!(pos, 2);
    }

    #[test]
    fn read_overrunning_push_fails_without_advancing() {
        let buf = [0x05, b'x'];
        let mut pos = 0;

        assert!(matches!(
            read_op(&buf, &mut pos),
            Err(OpReadError::PushOverrun {
                wanted: 5,
                available: 1
            })
        ));
        assert_eq!(pos, 0);
    }

    #[test]
    fn read_truncated_pushdata_length_fails() {
        let buf = [PUSHDATA2, 0x01];
        let mut pos = 0;

        assert!(read_op(&buf, &mut pos).is_err());
        assert_eq!(pos, 0);
    }

    #[test]
    fn append_push_roundtrips_across_length_encodings() {
        for size in [0usize, 1, 75, 76, 255, 256, 520] {
            let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
            let mut buf = Vec::new();
            append_push(&mut buf, &data).unwrap();

            let mut pos = 0;
            let op = read_op(&buf, &mut pos).unwrap();
            assert_eq!(op.data, &data[..], "size {size}");
            assert_eq!(pos, buf.len(), "size {size}");
        }
    }
}
