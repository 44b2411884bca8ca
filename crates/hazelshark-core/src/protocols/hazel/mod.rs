//! Hazel game protocol decoding.
//!
//! A datagram starts with a one-byte packet type. Reliable, Ping, Hello and
//! Acknowledgement packets follow it with a big-endian nonce; Hello carries
//! the client handshake, Acknowledgement an optional mask of missing packets,
//! and Reliable/Unreliable a run of length-tag-payload messages with no count
//! in front of them.
//!
//! Decoding is single-pass and stateless. Each read goes through
//! [`reader::ByteCursor`], which never advances past a failed read, so a
//! truncated datagram still yields the fields decoded before the failure.
//! Values outside the known enum tables are kept as `Unknown(raw)` rather
//! than treated as errors. Offsets and constants live in `layout`.

pub mod codecs;
pub mod error;
pub mod framer;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod record;
pub mod sink;
pub mod types;

pub use parser::{decode_packet, decode_packet_with_sink};
