//! BAP identity-attestation codec.
//!
//! Payload grammar: a kind push (`ATTEST`, `ID`, `REVOKE`, `ALIAS`), an
//! identity push, a kind-dependent secondary push, then optionally an
//! in-payload `0x7C` delimiter followed by an embedded signature chain.
//! The in-payload delimiter is distinct from the envelope-level pipe token;
//! it lives inside this segment's payload.

use bitcom_envelope_fmt::{Envelope, PIPE_BYTE, append_push, read_op};

use crate::aip::AIP_PREFIX;
use crate::{EncodeError, lossy};

/// Protocol id of the BAP attestation protocol.
pub const BAP_PREFIX: &str = "1BAPSuaPnfGnSBM3GLV9yhxUdYe4vGbdMT";

/// Attestation kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum BapType {
    /// Attest to an identity transaction.
    Attest,
    /// Declare an identity key.
    Id,
    /// Revoke a prior attestation.
    Revoke,
    /// Bind an alias to an address.
    Alias,
}

impl BapType {
    /// Matches a kind push against the known kinds.
    fn from_bytes(data: &[u8]) -> Option<Self> {
        match data {
            b"ATTEST" => Some(Self::Attest),
            b"ID" => Some(Self::Id),
            b"REVOKE" => Some(Self::Revoke),
            b"ALIAS" => Some(Self::Alias),
            _ => None,
        }
    }

    /// The wire spelling of the kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Attest => "ATTEST",
            Self::Id => "ID",
            Self::Revoke => "REVOKE",
            Self::Alias => "ALIAS",
        }
    }
}

/// Signature chain embedded after the in-payload delimiter.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BapSignature {
    /// Signing algorithm.
    pub algorithm: String,

    /// Address of the signing key.
    pub signer_address: String,

    /// The signature value, when one follows the signer address.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub signature: Option<String>,
}

/// A decoded BAP attestation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BapRecord {
    /// The attestation kind.
    pub ty: BapType,

    /// Identity key for `ID`, attested txid for `ATTEST`/`REVOKE`, alias
    /// for `ALIAS`.
    pub identity: String,

    /// Address for `ID`/`ALIAS`, sequence number for `ATTEST`/`REVOKE`.
    pub secondary: String,

    /// Embedded signature chain, when present.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub signature: Option<BapSignature>,

    /// Whether the record is signed by the identity itself; only `ID`
    /// records with a complete chain qualify.
    pub signed_by_id: bool,
}

/// Decodes the first BAP segment of an envelope, if any.
pub fn decode_bap(env: &Envelope<'_>) -> Option<BapRecord> {
    env.segments()
        .iter()
        .filter(|seg| seg.protocol() == BAP_PREFIX.as_bytes())
        .find_map(|seg| decode_bap_payload(seg.payload()))
}

/// Decodes a BAP attestation from a segment payload.
///
/// The kind, identity and secondary pushes are all required; an unknown
/// kind or an unreadable required push yields no record. The embedded
/// signature chain is optional: a `0x7C` push inside the payload is sought,
/// and when at least three operations follow it the chain is read from them
/// (the first one after the delimiter is the signature protocol's own id
/// and is skipped).
pub fn decode_bap_payload(payload: &[u8]) -> Option<BapRecord> {
    let mut pos = 0;

    let ty = BapType::from_bytes(read_op(payload, &mut pos).ok()?.data)?;
    let identity = lossy(read_op(payload, &mut pos).ok()?.data);
    let secondary = lossy(read_op(payload, &mut pos).ok()?.data);

    let mut tail: Vec<&[u8]> = Vec::new();
    while let Ok(op) = read_op(payload, &mut pos) {
        tail.push(op.data);
    }

    let mut signature = None;
    if let Some(p) = tail.iter().position(|data| *data == [PIPE_BYTE]) {
        if p + 3 < tail.len() {
            signature = Some(BapSignature {
                algorithm: lossy(tail[p + 2]),
                signer_address: lossy(tail[p + 3]),
                signature: tail.get(p + 4).map(|data| lossy(data)),
            });
        }
    }

    let signed_by_id =
        ty == BapType::Id && signature.as_ref().is_some_and(|sig| sig.signature.is_some());

    Some(BapRecord {
        ty,
        identity,
        secondary,
        signature,
        signed_by_id,
    })
}

/// Assembles the payload push sequence for a BAP attestation, embedding the
/// signature chain in the positional layout the decoder expects.
pub fn encode_bap_payload(record: &BapRecord) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    append_push(&mut out, record.ty.as_str().as_bytes())?;
    append_push(&mut out, record.identity.as_bytes())?;
    append_push(&mut out, record.secondary.as_bytes())?;

    if let Some(sig) = &record.signature {
        append_push(&mut out, &[PIPE_BYTE])?;
        append_push(&mut out, AIP_PREFIX.as_bytes())?;
        append_push(&mut out, sig.algorithm.as_bytes())?;
        append_push(&mut out, sig.signer_address.as_bytes())?;
        if let Some(value) = &sig.signature {
            append_push(&mut out, value.as_bytes())?;
        }
    }

    Ok(out)
}
