use std::fmt;

use serde::Serialize;

use super::codecs::GameVersion;
use super::reader::ByteRange;
use super::types::{Language, MessageTag, PacketType, QuickChatMode};

/// Text decoded from the wire; `lossy` is set when invalid UTF-8 was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub value: String,
    pub lossy: bool,
}

impl Text {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(value) => Self {
                value: value.to_string(),
                lossy: false,
            },
            Err(_) => Self {
                value: String::from_utf8_lossy(bytes).into_owned(),
                lossy: true,
            },
        }
    }
}

/// Interpreted value of a decoded field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    PacketType(PacketType),
    Nonce(u16),
    MissingPackets(Vec<u8>),
    Reserved(u8),
    ClientVersion { raw: u32, version: GameVersion },
    Name(Text),
    LastNonceReceived([u8; 4]),
    Language(Language),
    ChatMode(QuickChatMode),
}

impl FieldValue {
    /// True when the value came from outside a known enum table.
    pub fn is_unknown(&self) -> bool {
        match self {
            FieldValue::PacketType(value) => value.is_unknown(),
            FieldValue::Language(value) => value.is_unknown(),
            FieldValue::ChatMode(value) => value.is_unknown(),
            _ => false,
        }
    }
}

/// One decoded field: where it sits in the datagram and what it means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub name: &'static str,
    pub range: ByteRange,
    pub value: FieldValue,
}

impl fmt::Display for DecodedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            FieldValue::PacketType(value) => write!(f, "{}: {}", self.name, value),
            FieldValue::Nonce(value) => write!(f, "{}: {}", self.name, value),
            FieldValue::MissingPackets(missing) => {
                let joined = missing
                    .iter()
                    .map(|index| index.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}: [{}]", self.name, joined)
            }
            FieldValue::Reserved(value) => write!(f, "{}: 0x{:02x}", self.name, value),
            FieldValue::ClientVersion { raw, version } => {
                write!(f, "{}: {} ({})", self.name, version, raw)
            }
            FieldValue::Name(text) if text.lossy => {
                write!(f, "{}: {} (invalid UTF-8)", self.name, text.value)
            }
            FieldValue::Name(text) => write!(f, "{}: {}", self.name, text.value),
            FieldValue::LastNonceReceived(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
                write!(f, "{}: {}", self.name, hex)
            }
            FieldValue::Language(value) => write!(f, "{}: {}", self.name, value),
            FieldValue::ChatMode(value) => write!(f, "{}: {}", self.name, value),
        }
    }
}

/// One framed message inside a Reliable or Unreliable datagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message<'a> {
    pub tag: MessageTag,
    /// Header and payload together.
    pub range: ByteRange,
    #[serde(skip)]
    pub payload: &'a [u8],
}

impl Message<'_> {
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Decode result for a single datagram. Borrows the datagram bytes.
///
/// `packet_type` is `None` only when the datagram was empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PacketRecord<'a> {
    pub packet_type: Option<PacketType>,
    pub fields: Vec<DecodedField>,
    pub messages: Vec<Message<'a>>,
}

impl PacketRecord<'_> {
    pub fn new(packet_type: PacketType) -> Self {
        Self {
            packet_type: Some(packet_type),
            fields: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&DecodedField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn nonce(&self) -> Option<u16> {
        self.fields.iter().find_map(|field| match field.value {
            FieldValue::Nonce(nonce) => Some(nonce),
            _ => None,
        })
    }

    pub fn player_name(&self) -> Option<&Text> {
        self.fields.iter().find_map(|field| match &field.value {
            FieldValue::Name(text) => Some(text),
            _ => None,
        })
    }

    /// Short classification for summary columns, e.g. `Reliable [GameData]`
    /// or `Hello (Bob)`.
    pub fn summary(&self) -> String {
        let mut summary = match self.packet_type {
            Some(packet_type) => packet_type.to_string(),
            None => "Empty".to_string(),
        };
        if let Some(name) = self.player_name() {
            summary.push_str(&format!(" ({})", name.value));
        }
        if !self.messages.is_empty() {
            let tags = self
                .messages
                .iter()
                .map(|message| message.tag.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            summary.push_str(&format!(" [{}]", tags));
        }
        summary
    }
}
