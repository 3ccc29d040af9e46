//! AIP identity-signature codec.
//!
//! Payload grammar, in strict order: `algorithm`, `address`, `signature`,
//! then zero or more base-10 integer pushes naming the indexes of the
//! fields the signature covers.

use bitcom_envelope_fmt::{Envelope, append_push, read_op};

use crate::{EncodeError, lossy};

/// Protocol id of the AIP signature protocol.
pub const AIP_PREFIX: &str = "15PciHG22SNLQJXMoSUaWVi7WSqc7hCfva";

/// A decoded AIP signature.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AipRecord {
    /// Signing algorithm, e.g. `BITCOIN_ECDSA`.
    pub algorithm: String,

    /// Address of the signing key.
    pub address: String,

    /// The signature value.
    pub signature: String,

    /// Indexes of the signed fields; empty when the signature covers the
    /// whole output.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Vec::is_empty", default)
    )]
    pub field_indexes: Vec<i64>,
}

/// Decodes every AIP segment of an envelope, in script order.
pub fn decode_aips(env: &Envelope<'_>) -> Vec<AipRecord> {
    env.segments()
        .iter()
        .filter(|seg| seg.protocol() == AIP_PREFIX.as_bytes())
        .filter_map(|seg| decode_aip_payload(seg.payload()))
        .collect()
}

/// Decodes an AIP signature from a segment payload.
///
/// All three leading fields are required; if any cannot be read, no record
/// is produced. Trailing field indexes are scanned greedily and the scan
/// ends at the first push that cannot be read or does not parse as a
/// base-10 integer.
pub fn decode_aip_payload(payload: &[u8]) -> Option<AipRecord> {
    let mut pos = 0;

    let algorithm = read_op(payload, &mut pos).ok()?;
    let address = read_op(payload, &mut pos).ok()?;
    let signature = read_op(payload, &mut pos).ok()?;

    let mut field_indexes = Vec::new();
    while let Ok(op) = read_op(payload, &mut pos) {
        let Some(index) = std::str::from_utf8(op.data)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
        else {
            break;
        };
        field_indexes.push(index);
    }

    Some(AipRecord {
        algorithm: lossy(algorithm.data),
        address: lossy(address.data),
        signature: lossy(signature.data),
        field_indexes,
    })
}

/// Assembles the payload push sequence for an AIP signature.
pub fn encode_aip_payload(record: &AipRecord) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    append_push(&mut out, record.algorithm.as_bytes())?;
    append_push(&mut out, record.address.as_bytes())?;
    append_push(&mut out, record.signature.as_bytes())?;
    for index in &record.field_indexes {
        append_push(&mut out, index.to_string().as_bytes())?;
    }
    Ok(out)
}
