use super::error::DecodeError;
use super::layout;
use super::reader::{ByteCursor, ByteRange};
use super::record::Message;
use super::types::MessageTag;

/// Splits the rest of the cursor into length-tag-payload messages.
///
/// Each message is handed to `emit` as soon as it is complete, so messages
/// framed before a failure are kept by the caller. A payload that runs past
/// the end of the datagram fails with [`DecodeError::LengthMismatch`].
pub fn frame_messages<'a, F>(cursor: &mut ByteCursor<'a>, mut emit: F) -> Result<(), DecodeError>
where
    F: FnMut(Message<'a>),
{
    while !cursor.is_exhausted() {
        let start = cursor.position();
        let declared = usize::from(cursor.read_u16_le()?.value);
        let tag = MessageTag::from_code(cursor.read_u8()?.value);
        let payload = cursor.read(declared).map_err(|err| match err {
            DecodeError::OutOfBounds {
                offset, available, ..
            } => DecodeError::LengthMismatch {
                offset,
                declared,
                available,
            },
            other => other,
        })?;

        let range = ByteRange::between(start, cursor.position());
        debug_assert_eq!(range.len, layout::MESSAGE_HEADER_LEN + declared);
        tracing::trace!(%tag, start, len = declared, "framed hazel message");
        emit(Message {
            tag,
            range,
            payload: payload.value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::frame_messages;
    use crate::protocols::hazel::error::DecodeError;
    use crate::protocols::hazel::reader::{ByteCursor, ByteRange};
    use crate::protocols::hazel::record::Message;
    use crate::protocols::hazel::types::MessageTag;

    fn frame(data: &[u8]) -> (Vec<Message<'_>>, Result<(), DecodeError>, usize) {
        let mut cursor = ByteCursor::new(data);
        let mut messages = Vec::new();
        let result = frame_messages(&mut cursor, |message| messages.push(message));
        (messages, result, cursor.position())
    }

    #[test]
    fn single_message_consumes_buffer() {
        let data = [0x03, 0x00, 0x05, 0xAA, 0xBB, 0xCC];
        let (messages, result, position) = frame(&data);
        assert!(result.is_ok());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].tag, MessageTag::GameData);
        assert_eq!(messages[0].payload, &[0xAA, 0xBB, 0xCC]);
        assert_eq!(messages[0].range, ByteRange::new(0, 6));
        assert_eq!(position, data.len());
    }

    #[test]
    fn consecutive_messages_and_empty_payload() {
        let data = [0x00, 0x00, 0x01, 0x01, 0x00, 0x63, 0x7F];
        let (messages, result, _) = frame(&data);
        assert!(result.is_ok());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].tag, MessageTag::JoinGame);
        assert_eq!(messages[0].payload_len(), 0);
        assert_eq!(messages[1].tag, MessageTag::Unknown(0x63));
        assert_eq!(messages[1].range, ByteRange::new(3, 4));
    }

    #[test]
    fn overrunning_payload_keeps_earlier_messages() {
        let data = [0x01, 0x00, 0x02, 0x10, 0x05, 0x00, 0x05, 0x01];
        let (messages, result, position) = frame(&data);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            result.unwrap_err(),
            DecodeError::LengthMismatch {
                offset: 7,
                declared: 5,
                available: 1,
            }
        );
        assert_eq!(position, 7);
    }

    #[test]
    fn truncated_header_is_out_of_bounds() {
        let data = [0x01];
        let (messages, result, position) = frame(&data);
        assert!(messages.is_empty());
        assert!(matches!(
            result.unwrap_err(),
            DecodeError::OutOfBounds { offset: 0, .. }
        ));
        assert_eq!(position, 0);
    }

    #[test]
    fn empty_input_frames_nothing() {
        let (messages, result, _) = frame(&[]);
        assert!(messages.is_empty());
        assert!(result.is_ok());
    }
}
