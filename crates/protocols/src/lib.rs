//! Field-level codecs for the bitcom metaprotocols.
//!
//! Each codec interprets one envelope segment's payload as a typed record:
//!
//! - [`map`] for the MAP key/value store
//! - [`b`] for the B binary attachment
//! - [`aip`] for the AIP identity signature
//! - [`bap`] for the BAP identity attestation
//!
//! Decoders are fail-soft: payloads are untrusted on-chain data, so a codec
//! that cannot read its required leading fields returns no record, and one
//! with optional trailing fields stops scanning at the first unreadable or
//! unparsable field, keeping everything read before it. Encoders assemble a
//! payload as a well-formed push sequence, ready to be handed to the
//! envelope builder as one opaque blob; decoding a payload a codec encoded
//! reproduces the record exactly.

use thiserror::Error;

/// AIP identity-signature codec.
pub mod aip;

/// B binary-attachment codec.
pub mod b;

/// BAP identity-attestation codec.
pub mod bap;

/// MAP key/value-store codec.
pub mod map;

pub use aip::{AIP_PREFIX, AipRecord, decode_aip_payload, decode_aips, encode_aip_payload};
pub use b::{B_PREFIX, BRecord, decode_b_payload, decode_bs, encode_b_payload};
pub use bap::{
    BAP_PREFIX, BapRecord, BapSignature, BapType, decode_bap, decode_bap_payload,
    encode_bap_payload,
};
pub use map::{MAP_PREFIX, MapCmd, MapRecord, decode_map_payload, decode_maps, encode_map_payload};

/// Errors from assembling protocol payloads.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A field could not be expressed as a single data push.
    #[error("push: {0}")]
    Push(#[from] bitcom_envelope_fmt::EnvelopeBuildError),
}

/// Lossy UTF-8 conversion used for record string fields.
pub(crate) fn lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}
