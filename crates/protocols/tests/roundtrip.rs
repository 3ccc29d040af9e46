//! End-to-end coverage: codec payloads through the envelope builder and
//! back out of the parser.

use thiserror as _;

use bitcom_envelope_fmt::{OwnedEnvelope, Segment, parse_envelope};
use bitcom_protocols::{
    AIP_PREFIX, AipRecord, B_PREFIX, BRecord, MAP_PREFIX, MapCmd, MapRecord, decode_aips,
    decode_bs, decode_maps, encode_aip_payload, encode_b_payload, encode_map_payload,
};

fn sample_map() -> MapRecord {
    let mut entries = std::collections::BTreeMap::new();
    entries.insert("app".to_string(), "test".to_string());
    entries.insert("type".to_string(), "post".to_string());
    MapRecord {
        cmd: MapCmd::Set,
        entries,
    }
}

fn sample_b() -> BRecord {
    BRecord {
        data: b"hello world".to_vec(),
        media_type: "text/plain".to_string(),
        encoding: "utf-8".to_string(),
        filename: None,
    }
}

#[test]
fn map_then_b_segments_decode_in_script_order() {
    let map = sample_map();
    let b = sample_b();

    let env = OwnedEnvelope::new(
        Vec::new(),
        vec![
            Segment::new(MAP_PREFIX, encode_map_payload(&map).unwrap()),
            Segment::new(B_PREFIX, encode_b_payload(&b).unwrap()),
        ],
    );
    let script = env.to_script().unwrap();

    let decoded = parse_envelope(&script);
    assert_eq!(decoded.segments().len(), 2);
    assert_eq!(decoded.segments()[0].protocol(), MAP_PREFIX.as_bytes());
    assert_eq!(decoded.segments()[1].protocol(), B_PREFIX.as_bytes());
    assert!(decoded.segments()[0].offset() < decoded.segments()[1].offset());

    assert_eq!(decode_maps(&decoded), vec![map]);
    assert_eq!(decode_bs(&decoded), vec![b]);
}

#[test]
fn segment_payload_byte_ranges_are_exact() {
    let map_payload = encode_map_payload(&sample_map()).unwrap();
    let b_payload = encode_b_payload(&sample_b()).unwrap();

    let env = OwnedEnvelope::new(
        Vec::new(),
        vec![
            Segment::new(MAP_PREFIX, map_payload.clone()),
            Segment::new(B_PREFIX, b_payload.clone()),
        ],
    );
    let script = env.to_script().unwrap();

    let decoded = parse_envelope(&script);
    assert_eq!(decoded.segments()[0].payload(), &map_payload[..]);
    assert_eq!(decoded.segments()[1].payload(), &b_payload[..]);
}

#[test]
fn aip_segment_alongside_map_decodes() {
    let aip = AipRecord {
        algorithm: "BITCOIN_ECDSA".to_string(),
        address: "1Address".to_string(),
        signature: "Sig".to_string(),
        field_indexes: vec![1, 2, 3],
    };

    let env = OwnedEnvelope::new(
        Vec::new(),
        vec![
            Segment::new(MAP_PREFIX, encode_map_payload(&sample_map()).unwrap()),
            Segment::new(AIP_PREFIX, encode_aip_payload(&aip).unwrap()),
        ],
    );
    let script = env.to_script().unwrap();

    let decoded = parse_envelope(&script);
    assert_eq!(decode_aips(&decoded), vec![aip]);
    assert_eq!(decode_maps(&decoded).len(), 1);
}

#[test]
fn full_envelope_roundtrip_is_byte_exact() {
    let env = OwnedEnvelope::new(
        Vec::new(),
        vec![
            Segment::new(MAP_PREFIX, encode_map_payload(&sample_map()).unwrap()),
            Segment::new(B_PREFIX, encode_b_payload(&sample_b()).unwrap()),
        ],
    );
    let script = env.to_script().unwrap();

    let reencoded = parse_envelope(&script).to_owned().to_script().unwrap();
    assert_eq!(reencoded, script);
}
