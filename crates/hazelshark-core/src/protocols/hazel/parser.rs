use super::codecs::{GameVersion, missing_packets};
use super::error::DecodeError;
use super::framer::frame_messages;
use super::layout;
use super::reader::{ByteCursor, ByteRange};
use super::record::{DecodedField, FieldValue, PacketRecord, Text};
use super::sink::FieldSink;
use super::types::{Language, PacketType, QuickChatMode};

pub const FIELD_TYPE: &str = "Type";
pub const FIELD_NONCE: &str = "Nonce";
pub const FIELD_MISSING_PACKETS: &str = "Missing packets";
pub const FIELD_RESERVED: &str = "Reserved";
pub const FIELD_CLIENT_VERSION: &str = "Client version";
pub const FIELD_NAME: &str = "Name";
pub const FIELD_LAST_NONCE: &str = "Last nonce received";
pub const FIELD_LANGUAGE: &str = "Language";
pub const FIELD_CHAT_MODE: &str = "Chat mode";

/// Decode one Hazel datagram.
///
/// Always returns a record. When a read runs out of bytes the record holds
/// everything decoded up to that point and the error says where it stopped.
///
/// # Examples
/// ```
/// use hazelshark_core::{MessageTag, PacketType, decode_packet};
///
/// let datagram = [0x01, 0x00, 0x07, 0x03, 0x00, 0x05, 0xAA, 0xBB, 0xCC];
/// let (record, error) = decode_packet(&datagram);
/// assert!(error.is_none());
/// assert_eq!(record.packet_type, Some(PacketType::Reliable));
/// assert_eq!(record.nonce(), Some(7));
/// assert_eq!(record.messages[0].tag, MessageTag::GameData);
/// assert_eq!(record.summary(), "Reliable [GameData]");
/// ```
pub fn decode_packet(payload: &[u8]) -> (PacketRecord<'_>, Option<DecodeError>) {
    decode_packet_with_sink(payload, &mut ())
}

/// Like [`decode_packet`], also reporting each field and message to `sink`
/// in the order they are decoded.
pub fn decode_packet_with_sink<'a, S>(
    payload: &'a [u8],
    sink: &mut S,
) -> (PacketRecord<'a>, Option<DecodeError>)
where
    S: FieldSink + ?Sized,
{
    let mut dissector = Dissector {
        cursor: ByteCursor::new(payload),
        record: PacketRecord::default(),
        sink,
    };
    let error = dissector.run().err();
    if let Some(err) = &error {
        tracing::debug!(
            offset = err.offset(),
            len = payload.len(),
            error = %err,
            "hazel datagram decode stopped early"
        );
    }
    tracing::trace!(
        summary = %dissector.record.summary(),
        fields = dissector.record.fields.len(),
        messages = dissector.record.messages.len(),
        "decoded hazel datagram"
    );
    (dissector.record, error)
}

struct Dissector<'a, 's, S: ?Sized> {
    cursor: ByteCursor<'a>,
    record: PacketRecord<'a>,
    sink: &'s mut S,
}

impl<S: FieldSink + ?Sized> Dissector<'_, '_, S> {
    fn run(&mut self) -> Result<(), DecodeError> {
        let type_byte = self.cursor.read_u8()?;
        let packet_type = PacketType::from_code(type_byte.value);
        self.record.packet_type = Some(packet_type);
        self.emit(FIELD_TYPE, type_byte.range, FieldValue::PacketType(packet_type));

        if packet_type.carries_nonce() {
            let nonce = self.cursor.read_u16_be()?;
            self.emit(FIELD_NONCE, nonce.range, FieldValue::Nonce(nonce.value));
        }

        match packet_type {
            PacketType::Acknowledgement => self.acknowledgement(),
            PacketType::Hello => self.hello(),
            PacketType::Reliable | PacketType::Unreliable => self.messages(),
            _ => Ok(()),
        }
    }

    fn acknowledgement(&mut self) -> Result<(), DecodeError> {
        if self.cursor.is_exhausted() {
            return Ok(());
        }
        let mask = self.cursor.read_u8()?;
        self.emit(
            FIELD_MISSING_PACKETS,
            mask.range,
            FieldValue::MissingPackets(missing_packets(mask.value)),
        );
        Ok(())
    }

    fn hello(&mut self) -> Result<(), DecodeError> {
        let reserved = self.cursor.read_u8()?;
        self.emit(FIELD_RESERVED, reserved.range, FieldValue::Reserved(reserved.value));

        let version = self.cursor.read_u32_le()?;
        self.emit(
            FIELD_CLIENT_VERSION,
            version.range,
            FieldValue::ClientVersion {
                raw: version.value,
                version: GameVersion::from_raw(version.value),
            },
        );

        let name_len = self.cursor.read_packed_u32()?;
        let name = self
            .cursor
            .read(usize::try_from(name_len.value).unwrap_or(usize::MAX))?;
        self.emit(FIELD_NAME, name.range, FieldValue::Name(Text::from_bytes(name.value)));

        let last_nonce = self.cursor.read_array::<{ layout::HELLO_LAST_NONCE_LEN }>()?;
        self.emit(
            FIELD_LAST_NONCE,
            last_nonce.range,
            FieldValue::LastNonceReceived(last_nonce.value),
        );

        let language = self.cursor.read_u32_le()?;
        self.emit(
            FIELD_LANGUAGE,
            language.range,
            FieldValue::Language(Language::from_code(language.value)),
        );

        let chat_mode = self.cursor.read_u8()?;
        self.emit(
            FIELD_CHAT_MODE,
            chat_mode.range,
            FieldValue::ChatMode(QuickChatMode::from_code(chat_mode.value)),
        );
        Ok(())
    }

    fn messages(&mut self) -> Result<(), DecodeError> {
        let Self {
            cursor,
            record,
            sink,
        } = self;
        frame_messages(cursor, |message| {
            sink.on_message(&message);
            record.messages.push(message);
        })
    }

    fn emit(&mut self, name: &'static str, range: ByteRange, value: FieldValue) {
        if value.is_unknown() {
            tracing::debug!(field = name, offset = range.start, "unknown hazel enum value");
        }
        let field = DecodedField { name, range, value };
        self.sink.on_field(&field);
        self.record.fields.push(field);
    }
}
