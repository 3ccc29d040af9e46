//! MAP key/value-store codec.
//!
//! Payload grammar: a command push (`SET`, `DEL`, `ADD`, `SELECT`) followed,
//! for `SET` only, by alternating key and value pushes. Later writes to the
//! same key win. The other commands carry no operands on the wire today.

use std::collections::BTreeMap;

use bitcom_envelope_fmt::{Envelope, append_push, read_op};

use crate::{EncodeError, lossy};

/// Protocol id of the MAP key/value store.
pub const MAP_PREFIX: &str = "1PuQa7K62MiKCtssSLKy1kh56WWU7MtUR5";

/// MAP command verb.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum MapCmd {
    /// Set key/value entries.
    Set,
    /// Delete keys.
    Del,
    /// Append to a key.
    Add,
    /// Select a context.
    Select,
}

impl MapCmd {
    /// Matches a command push against the known verbs.
    fn from_bytes(data: &[u8]) -> Option<Self> {
        match data {
            b"SET" => Some(Self::Set),
            b"DEL" => Some(Self::Del),
            b"ADD" => Some(Self::Add),
            b"SELECT" => Some(Self::Select),
            _ => None,
        }
    }

    /// The wire spelling of the verb.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::Del => "DEL",
            Self::Add => "ADD",
            Self::Select => "SELECT",
        }
    }
}

/// A decoded MAP record.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapRecord {
    /// The command verb.
    pub cmd: MapCmd,

    /// Key/value entries; populated only for [`MapCmd::Set`].
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "BTreeMap::is_empty", default)
    )]
    pub entries: BTreeMap<String, String>,
}

/// Decodes every MAP segment of an envelope, in script order.
pub fn decode_maps(env: &Envelope<'_>) -> Vec<MapRecord> {
    env.segments()
        .iter()
        .filter(|seg| seg.protocol() == MAP_PREFIX.as_bytes())
        .filter_map(|seg| decode_map_payload(seg.payload()))
        .collect()
}

/// Decodes a MAP record from a segment payload.
///
/// Returns `None` when the command push cannot be read or is not a known
/// verb. For `SET`, a trailing key with no value is silently dropped and
/// every complete pair read before it is kept.
pub fn decode_map_payload(payload: &[u8]) -> Option<MapRecord> {
    let mut pos = 0;

    let cmd_op = read_op(payload, &mut pos).ok()?;
    let cmd = MapCmd::from_bytes(cmd_op.data)?;

    let mut entries = BTreeMap::new();
    if cmd == MapCmd::Set {
        loop {
            let Ok(key) = read_op(payload, &mut pos) else {
                break;
            };
            let Ok(value) = read_op(payload, &mut pos) else {
                // Dangling key without a value.
                break;
            };
            entries.insert(normalize(key.data), normalize(value.data));
        }
    }

    Some(MapRecord { cmd, entries })
}

/// Assembles the payload push sequence for a MAP record.
pub fn encode_map_payload(record: &MapRecord) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    append_push(&mut out, record.cmd.as_str().as_bytes())?;

    if record.cmd == MapCmd::Set {
        for (key, value) in &record.entries {
            append_push(&mut out, key.as_bytes())?;
            append_push(&mut out, value.as_bytes())?;
        }
    }

    Ok(out)
}

/// Keys and values are lossy UTF-8 with embedded NULs normalized to spaces.
fn normalize(data: &[u8]) -> String {
    lossy(data).replace('\0', " ")
}
