//! Limits applied while decoding and narrowing.

/// Default maximum length of JSON text accepted by the decoder (64 MiB).
pub const MAX_TEXT_LEN: usize = 64 * 1024 * 1024;

/// Largest integer magnitude an f64 represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;
