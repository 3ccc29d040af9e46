//! Envelope and segment types.
//!
//! Borrowed views ([`SegmentRef`], [`Envelope`]) come out of the parser and
//! share the source script's backing storage; owned counterparts
//! ([`Segment`], [`OwnedEnvelope`]) are for building scripts and for callers
//! that need the data to outlive the script buffer.

/// One `(protocol id, payload)` unit of an envelope, borrowing the source
/// script.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SegmentRef<'b> {
    protocol: &'b [u8],
    payload: &'b [u8],
    offset: usize,
}

impl<'b> SegmentRef<'b> {
    /// Constructs a new instance from the segment's parts.
    pub fn new(protocol: &'b [u8], payload: &'b [u8], offset: usize) -> Self {
        Self {
            protocol,
            payload,
            offset,
        }
    }

    /// Gets the protocol id bytes.
    ///
    /// Protocol ids are opaque, case-sensitive tags; match them exactly.
    pub fn protocol(&self) -> &'b [u8] {
        self.protocol
    }

    /// Gets the payload byte range.
    pub fn payload(&self) -> &'b [u8] {
        self.payload
    }

    /// Byte position in the source script where the protocol-id push began.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Converts this borrowed segment into an owned [`Segment`], dropping
    /// the source-script offset.
    pub fn to_owned(&self) -> Segment {
        Segment {
            protocol: self.protocol.to_vec(),
            payload: self.payload.to_vec(),
        }
    }
}

/// Owned version of a segment, used when building envelope scripts.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    protocol: Vec<u8>,
    payload: Vec<u8>,
}

impl Segment {
    /// Constructs a new instance from a protocol id and payload.
    ///
    /// The payload is treated as one opaque blob; callers assembling it from
    /// several logical fields must pre-assemble a well-formed push sequence.
    pub fn new(protocol: impl Into<Vec<u8>>, payload: Vec<u8>) -> Self {
        Self {
            protocol: protocol.into(),
            payload,
        }
    }

    /// Gets the protocol id bytes.
    pub fn protocol(&self) -> &[u8] {
        &self.protocol
    }

    /// Gets the payload byte range.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// Decoded representation of everything following `OP_RETURN`, borrowing
/// the source script.
///
/// An envelope with zero segments is valid; it is what decoding a script
/// without `OP_RETURN` produces.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Envelope<'b> {
    prefix: &'b [u8],
    segments: Vec<SegmentRef<'b>>,
}

impl<'b> Envelope<'b> {
    /// Constructs a new instance from parts.
    pub fn new(prefix: &'b [u8], segments: Vec<SegmentRef<'b>>) -> Self {
        Self { prefix, segments }
    }

    /// Every byte strictly preceding the `OP_RETURN` marker.
    pub fn prefix(&self) -> &'b [u8] {
        self.prefix
    }

    /// The envelope's segments, in script order.
    pub fn segments(&self) -> &[SegmentRef<'b>] {
        &self.segments
    }

    /// Converts to an [`OwnedEnvelope`].
    pub fn to_owned(&self) -> OwnedEnvelope {
        OwnedEnvelope {
            prefix: self.prefix.to_vec(),
            segments: self.segments.iter().map(|s| s.to_owned()).collect(),
        }
    }
}

/// An envelope that owns its contents.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnedEnvelope {
    prefix: Vec<u8>,
    segments: Vec<Segment>,
}

impl OwnedEnvelope {
    /// Constructs a new instance from parts.
    pub fn new(prefix: Vec<u8>, segments: Vec<Segment>) -> Self {
        Self { prefix, segments }
    }

    /// Every byte strictly preceding the `OP_RETURN` marker.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// The envelope's segments, in script order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Appends a segment.
    pub fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_to_owned_keeps_bytes() {
        let seg = SegmentRef::new(b"1Test", b"\x01a", 7);
        assert_eq!(seg.offset(), 7);

        let owned = seg.to_owned();
        assert_eq!(owned.protocol(), b"1Test");
        assert_eq!(owned.payload(), b"\x01a");
    }

    #[test]
    fn envelope_to_owned_keeps_order() {
        let segs = vec![
            SegmentRef::new(b"a", b"", 1),
            SegmentRef::new(b"b", b"", 5),
        ];
        let env = Envelope::new(b"pre", segs);

        let owned = env.to_owned();
        assert_eq!(owned.prefix(), b"pre");
        assert_eq!(owned.segments()[0].protocol(), b"a");
        assert_eq!(owned.segments()[1].protocol(), b"b");
    }
}
