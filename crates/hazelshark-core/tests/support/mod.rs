#![allow(dead_code)]

use std::fs;
use std::path::Path;

use etherparse::PacketBuilder;

pub const CLIENT: [u8; 4] = [192, 168, 1, 20];
pub const SERVER: [u8; 4] = [203, 0, 113, 7];
pub const CLIENT_PORT: u16 = 50_123;
pub const SERVER_PORT: u16 = 22_023;

const PCAPNG_SECTION_HEADER: u32 = 0x0A0D_0D0A;
const PCAPNG_INTERFACE_DESCRIPTION: u32 = 1;
const PCAPNG_ENHANCED_PACKET: u32 = 6;
const LINKTYPE_ETHERNET: u16 = 1;
const OPT_ENDOFOPT: u16 = 0;
const IF_TSRESOL: u16 = 9;

/// One captured frame: microsecond timestamp plus link-layer bytes.
pub struct Frame {
    pub ts_us: u64,
    pub data: Vec<u8>,
}

pub fn to_server(ts_us: u64, payload: &[u8]) -> Frame {
    udp_frame(ts_us, CLIENT, CLIENT_PORT, SERVER, SERVER_PORT, payload)
}

pub fn to_client(ts_us: u64, payload: &[u8]) -> Frame {
    udp_frame(ts_us, SERVER, SERVER_PORT, CLIENT, CLIENT_PORT, payload)
}

pub fn udp_frame(
    ts_us: u64,
    src: [u8; 4],
    src_port: u16,
    dst: [u8; 4],
    dst_port: u16,
    payload: &[u8],
) -> Frame {
    let builder = PacketBuilder::ethernet2([0x02, 0, 0, 0, 0, 0x01], [0x02, 0, 0, 0, 0, 0x02])
        .ipv4(src, dst, 64)
        .udp(src_port, dst_port);
    let mut data = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut data, payload).unwrap();
    Frame { ts_us, data }
}

/// A short session: hello, ping, reliable game data, ack, disconnect.
pub fn session() -> Vec<Frame> {
    vec![
        to_server(1_000_000, &hello_bob()),
        to_client(1_250_000, &[0x0A, 0x00, 0x01, 0xFF]),
        to_server(2_000_000, &[0x0C, 0x00, 0x02]),
        to_server(
            3_000_000,
            &[0x01, 0x00, 0x03, 0x02, 0x00, 0x05, 0xAA, 0xBB, 0x00, 0x00, 0x01],
        ),
        to_client(3_500_000, &[0x0A, 0x00, 0x03, 0xF6]),
        to_server(5_000_000, &[0x09]),
    ]
}

/// Hello from "Bob": nonce 1, version 2021.6.30.0, language English, free chat.
pub fn hello_bob() -> Vec<u8> {
    let mut payload = vec![0x08, 0x00, 0x01, 0x00];
    payload.extend_from_slice(&50_537_300u32.to_le_bytes());
    payload.push(0x03);
    payload.extend_from_slice(b"Bob");
    payload.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    payload.extend_from_slice(&0u32.to_le_bytes());
    payload.push(0x01);
    payload
}

pub fn write_pcapng(path: &Path, frames: &[Frame]) {
    write_pcapng_with_resolution(path, frames, None);
}

/// PCAPNG whose interface declares nanosecond timestamps (`if_tsresol` 9).
pub fn write_pcapng_nanos(path: &Path, frames: &[Frame]) {
    write_pcapng_with_resolution(path, frames, Some(9));
}

/// One client-to-server frame per datagram, one second apart.
pub fn write_datagrams(path: &Path, datagrams: &[Vec<u8>], dst_port: u16) {
    let frames: Vec<Frame> = datagrams
        .iter()
        .enumerate()
        .map(|(idx, payload)| {
            let ts_us = (idx as u64 + 1) * 1_000_000;
            udp_frame(ts_us, CLIENT, CLIENT_PORT, SERVER, dst_port, payload)
        })
        .collect();
    write_pcapng(path, &frames);
}

fn write_pcapng_with_resolution(path: &Path, frames: &[Frame], tsresol: Option<u8>) {
    let ticks_per_us = match tsresol {
        Some(9) => 1_000,
        _ => 1,
    };
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(PCAPNG_SECTION_HEADER, &section_header_body()));
    output.extend_from_slice(&pcapng_block(
        PCAPNG_INTERFACE_DESCRIPTION,
        &interface_desc_body(tsresol),
    ));
    for frame in frames {
        output.extend_from_slice(&pcapng_block(
            PCAPNG_ENHANCED_PACKET,
            &enhanced_packet_body(frame.ts_us * ticks_per_us, &frame.data),
        ));
    }
    fs::write(path, output).unwrap();
}

/// Classic little-endian PCAP with microsecond timestamps.
pub fn write_legacy_pcap(path: &Path, frames: &[Frame]) {
    let mut output = Vec::new();
    output.extend_from_slice(&0xA1B2_C3D4u32.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65_535u32.to_le_bytes());
    output.extend_from_slice(&u32::from(LINKTYPE_ETHERNET).to_le_bytes());
    for frame in frames {
        let len = frame.data.len() as u32;
        output.extend_from_slice(&((frame.ts_us / 1_000_000) as u32).to_le_bytes());
        output.extend_from_slice(&((frame.ts_us % 1_000_000) as u32).to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(&frame.data);
    }
    fs::write(path, output).unwrap();
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (8 + body.len() + 4) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B_3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body(tsresol: Option<u8>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&LINKTYPE_ETHERNET.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65_535u32.to_be_bytes());
    if let Some(tsresol) = tsresol {
        body.extend_from_slice(&IF_TSRESOL.to_be_bytes());
        body.extend_from_slice(&1u16.to_be_bytes());
        body.extend_from_slice(&[tsresol, 0, 0, 0]);
        body.extend_from_slice(&OPT_ENDOFOPT.to_be_bytes());
        body.extend_from_slice(&0u16.to_be_bytes());
    }
    body
}

fn enhanced_packet_body(ticks: u64, data: &[u8]) -> Vec<u8> {
    let cap_len = data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&((ticks >> 32) as u32).to_be_bytes());
    body.extend_from_slice(&(ticks as u32).to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(data);
    body.resize(body.len() + (4 - data.len() % 4) % 4, 0);
    body
}
