use hazelshark_core::{ByteCursor, DecodeError, GameVersion, decode_packet};
use proptest::prelude::*;

fn pack(mut value: u32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

proptest! {
    #[test]
    fn packed_roundtrip_up_to_four_bytes(value in 0u32..(1 << 28)) {
        let bytes = pack(value);
        prop_assert!(bytes.len() <= 4);
        let mut cursor = ByteCursor::new(&bytes);
        let packed = cursor.read_packed().unwrap();
        prop_assert_eq!(packed.value, value as i32);
        prop_assert_eq!(packed.range.len, bytes.len());
        prop_assert!(cursor.is_exhausted());
    }

    #[test]
    fn packed_roundtrip_full_range(value in any::<u32>()) {
        let bytes = pack(value);
        let mut cursor = ByteCursor::new(&bytes);
        let packed = cursor.read_packed_u32().unwrap();
        prop_assert_eq!(packed.value, value);
        prop_assert_eq!(packed.range.len, bytes.len());
    }

    #[test]
    fn unterminated_packed_rewinds(prefix in proptest::collection::vec(0x80u8..=0xFF, 5..8)) {
        let mut cursor = ByteCursor::new(&prefix);
        let err = cursor.read_packed().unwrap_err();
        prop_assert_eq!(err, DecodeError::MalformedVarInt { offset: 0, max_len: 5 });
        prop_assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn version_decomposition_recomposes(raw in any::<u32>()) {
        let version = GameVersion::from_raw(raw);
        prop_assert!(version.month < 25_000 / 1_800 + 1);
        prop_assert!(version.day < 36);
        prop_assert!(version.revision < 50);
        prop_assert_eq!(version.to_raw(), Some(raw));
    }

    #[test]
    fn version_parts_survive_packing(
        year in 0u32..171_798,
        month in 0u32..13,
        day in 0u32..36,
        revision in 0u32..50,
    ) {
        let raw = year * 25_000 + month * 1_800 + day * 50 + revision;
        prop_assert_eq!(
            GameVersion::from_raw(raw),
            GameVersion { year, month, day, revision }
        );
    }

    #[test]
    fn arbitrary_datagrams_never_panic(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        let (record, error) = decode_packet(&data);
        if data.is_empty() {
            prop_assert!(record.packet_type.is_none());
            prop_assert!(error.as_ref().is_some_and(DecodeError::is_out_of_bounds));
        } else {
            prop_assert!(record.packet_type.is_some());
        }
        for field in &record.fields {
            prop_assert!(field.range.end() <= data.len());
        }
        for message in &record.messages {
            prop_assert!(message.range.end() <= data.len());
        }
        if let Some(err) = error {
            prop_assert!(err.offset() <= data.len());
        }
    }

    #[test]
    fn reliable_framing_covers_payload(
        payloads in proptest::collection::vec(
            (0u8..24, proptest::collection::vec(any::<u8>(), 0..16)),
            0..6,
        )
    ) {
        let mut data = vec![0x01, 0x00, 0x01];
        for (tag, payload) in &payloads {
            data.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            data.push(*tag);
            data.extend_from_slice(payload);
        }
        let (record, error) = decode_packet(&data);
        prop_assert!(error.is_none());
        prop_assert_eq!(record.messages.len(), payloads.len());
        let covered: usize = record.messages.iter().map(|m| m.range.len).sum();
        prop_assert_eq!(covered, data.len() - 3);
    }
}
