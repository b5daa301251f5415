//! Short identifiers for new entities (chapters, devices, regions, tracks, elements).
//!
//! Ids are drawn from `uuid` v4 randomness and encoded as 12 URL-safe
//! characters, so they can travel in paths and JSON payloads unescaped.

use uuid::Uuid;

/// Length of every generated id.
pub const ID_LEN: usize = 12;

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

/// Generate a fresh short id.
pub fn generate() -> String {
    encode(Uuid::new_v4().as_u128())
}

/// Use `supplied` when present (replay of a loaded document), otherwise generate.
pub fn supplied_or_new(supplied: Option<&str>) -> String {
    match supplied {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate(),
    }
}

// Low 72 bits, 6 bits per character.
fn encode(mut bits: u128) -> String {
    let mut out = String::with_capacity(ID_LEN);
    for _ in 0..ID_LEN {
        out.push(ALPHABET[(bits & 0x3f) as usize] as char);
        bits >>= 6;
    }
    out
}
