//! Envelope script assembly.

use bitcoin::ScriptBuf;
use bitcoin::opcodes::all::OP_RETURN;

use crate::PIPE_BYTE;
use crate::errors::EnvelopeBuildError;
use crate::ops::append_push;
use crate::types::{OwnedEnvelope, Segment};

/// Reassembles an envelope script from a prefix and ordered segments.
///
/// Emits the prefix bytes verbatim, then, only when `segments` is non-empty,
/// an `OP_RETURN`, then per segment a push of the protocol id, the payload
/// bytes as one opaque blob, and a pipe push between segments. The payload's
/// inner operation structure is never re-derived: a payload obtained from a
/// prior decode (or assembled by a protocol codec) round-trips byte for
/// byte, while a hand-built payload must already be a well-formed push
/// sequence.
pub fn build_envelope_script(
    prefix: &[u8],
    segments: &[Segment],
) -> Result<ScriptBuf, EnvelopeBuildError> {
    let mut out = prefix.to_vec();

    if !segments.is_empty() {
        out.push(OP_RETURN.to_u8());
        for (i, seg) in segments.iter().enumerate() {
            append_push(&mut out, seg.protocol())?;
            out.extend_from_slice(seg.payload());
            if i < segments.len() - 1 {
                append_push(&mut out, &[PIPE_BYTE])?;
            }
        }
    }

    Ok(ScriptBuf::from_bytes(out))
}

impl OwnedEnvelope {
    /// Reassembles this envelope into a script.
    pub fn to_script(&self) -> Result<ScriptBuf, EnvelopeBuildError> {
        build_envelope_script(self.prefix(), self.segments())
    }
}
