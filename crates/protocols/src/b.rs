//! B binary-attachment codec.
//!
//! Payload grammar, in strict order: `data` (raw bytes), `media_type`,
//! `encoding`, then an optional `filename`.

use bitcom_envelope_fmt::{Envelope, append_push, read_op};

use crate::{EncodeError, lossy};

/// Protocol id of the B attachment protocol.
pub const B_PREFIX: &str = "19HxigV4QyBv3tHpQVcUEQyq1pzZVdoAut";

// Well-known media types.

/// Plain text.
pub const MEDIA_TYPE_TEXT_PLAIN: &str = "text/plain";
/// Markdown text.
pub const MEDIA_TYPE_TEXT_MARKDOWN: &str = "text/markdown";
/// HTML text.
pub const MEDIA_TYPE_TEXT_HTML: &str = "text/html";
/// PNG image.
pub const MEDIA_TYPE_IMAGE_PNG: &str = "image/png";
/// JPEG image.
pub const MEDIA_TYPE_IMAGE_JPEG: &str = "image/jpeg";

// Well-known encodings.

/// UTF-8 text encoding.
pub const ENCODING_UTF8: &str = "utf-8";
/// Raw binary encoding.
pub const ENCODING_BINARY: &str = "binary";

/// A decoded B attachment.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BRecord {
    /// The attachment bytes.
    pub data: Vec<u8>,

    /// Media type of the attachment, e.g. `text/plain`.
    pub media_type: String,

    /// Content encoding, e.g. `utf-8` or `binary`.
    pub encoding: String,

    /// Optional filename; absence is not an error.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub filename: Option<String>,
}

/// Decodes every B segment of an envelope, in script order.
pub fn decode_bs(env: &Envelope<'_>) -> Vec<BRecord> {
    env.segments()
        .iter()
        .filter(|seg| seg.protocol() == B_PREFIX.as_bytes())
        .filter_map(|seg| decode_b_payload(seg.payload()))
        .collect()
}

/// Decodes a B attachment from a segment payload.
///
/// The first three fields are required; if any cannot be read, no record is
/// produced. The filename is optional.
pub fn decode_b_payload(payload: &[u8]) -> Option<BRecord> {
    let mut pos = 0;

    let data = read_op(payload, &mut pos).ok()?;
    let media_type = read_op(payload, &mut pos).ok()?;
    let encoding = read_op(payload, &mut pos).ok()?;
    let filename = read_op(payload, &mut pos).ok().map(|op| lossy(op.data));

    Some(BRecord {
        data: data.data.to_vec(),
        media_type: lossy(media_type.data),
        encoding: lossy(encoding.data),
        filename,
    })
}

/// Assembles the payload push sequence for a B attachment.
pub fn encode_b_payload(record: &BRecord) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    append_push(&mut out, &record.data)?;
    append_push(&mut out, record.media_type.as_bytes())?;
    append_push(&mut out, record.encoding.as_bytes())?;
    if let Some(filename) = &record.filename {
        append_push(&mut out, filename.as_bytes())?;
    }
    Ok(out)
}
