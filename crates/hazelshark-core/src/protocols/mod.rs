//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: wire constants and sizes (source of truth)
//! - `reader`: safe, forward-only byte access and encodings
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; sources and analysis layers handle
//! file access and aggregation.

pub mod hazel;
