//! Bitcom envelope format utilities.
//!
//! This crate decodes and re-encodes the OP_RETURN data-carrier layout used
//! by the bitcom family of metaprotocols, where several independent protocol
//! payloads share a single output script:
//!
//! ```text
//! <prefix ops>
//! OP_RETURN
//! <push: protocol id> <payload ops>
//! <push: 0x7C>
//! <push: protocol id> <payload ops>
//! ...
//! ```
//!
//! Everything before `OP_RETURN` is preserved verbatim as the envelope
//! prefix. Each segment is the first data push after `OP_RETURN` (or after a
//! pipe token) followed by every byte up to the next pipe token or the end of
//! the script. The pipe token itself is always a minimal one-byte data push
//! of `0x7C` and belongs to neither segment.
//!
//! Decoding is fail-soft: scripts are untrusted on-chain data, so malformed
//! input truncates the result instead of raising an error. A script without
//! `OP_RETURN` decodes to an envelope with zero segments.
//!
//! # Examples
//!
//! ```
//! use bitcom_envelope_fmt::{OwnedEnvelope, Segment, parse_envelope};
//!
//! let env = OwnedEnvelope::new(
//!     Vec::new(),
//!     vec![Segment::new("1Test", Vec::new())],
//! );
//! let script = env.to_script().unwrap();
//!
//! let decoded = parse_envelope(&script);
//! assert_eq!(decoded.segments().len(), 1);
//! assert_eq!(decoded.segments()[0].protocol(), b"1Test");
//! ```

/// Envelope script assembly.
pub mod builder;

/// Error types for cursor reads and script building.
pub mod errors;

/// Positional operation cursor over raw script bytes.
pub mod ops;

/// Envelope scanning and segment splitting.
pub mod parser;

/// Envelope and segment types.
pub mod types;

pub use builder::build_envelope_script;
pub use errors::{EnvelopeBuildError, OpReadError};
pub use ops::{Op, append_push, read_op};
pub use parser::{find_pipe, find_return, parse_envelope, parse_envelope_bytes};
pub use types::{Envelope, OwnedEnvelope, Segment, SegmentRef};

/// Payload byte of the pipe token delimiting envelope segments.
pub const PIPE_BYTE: u8 = b'|';
