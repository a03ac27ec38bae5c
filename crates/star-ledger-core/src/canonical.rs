//! Canonical CBOR encoding for deterministic block hashing.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (timestamps are i64 seconds)
//!
//! The canonical encoding is critical: it ensures that the same sealed fields
//! produce identical bytes (and thus identical hashes) across all platforms.

use ciborium::value::Value;

use crate::block::Block;
use crate::error::CoreError;
use crate::types::BlockHash;

/// Block field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const TIME: u64 = 1;
    pub const PREVIOUS_HASH: u64 = 2;
    pub const PAYLOAD: u64 = 3;
    pub const HASH: u64 = 4;
}

/// A value the encoder knows how to write canonically.
enum Field<'a> {
    Uint(u64),
    Int(i64),
    Bytes(&'a [u8]),
    Null,
}

/// Encode the sealed fields of a block: the preimage of its hash.
pub fn canonical_seal_bytes(
    height: u64,
    time: i64,
    previous_block_hash: Option<&BlockHash>,
    payload: &[u8],
) -> Vec<u8> {
    let entries = seal_entries(height, time, previous_block_hash, payload);
    let mut buf = Vec::new();
    encode_map_canonical(&mut buf, &entries);
    buf
}

/// Encode a sealed block, hash included, for export.
pub fn encode_block(block: &Block) -> Vec<u8> {
    let mut entries = seal_entries(
        block.height,
        block.time,
        block.previous_block_hash.as_ref(),
        &block.payload,
    );
    entries.push((keys::HASH, Field::Bytes(block.hash.as_bytes())));

    let mut buf = Vec::new();
    encode_map_canonical(&mut buf, &entries);
    buf
}

fn seal_entries<'a>(
    height: u64,
    time: i64,
    previous_block_hash: Option<&'a BlockHash>,
    payload: &'a [u8],
) -> Vec<(u64, Field<'a>)> {
    let previous = match previous_block_hash {
        Some(hash) => Field::Bytes(hash.as_bytes()),
        None => Field::Null,
    };

    vec![
        (keys::HEIGHT, Field::Uint(height)),
        (keys::TIME, Field::Int(time)),
        (keys::PREVIOUS_HASH, previous),
        (keys::PAYLOAD, Field::Bytes(payload)),
    ]
}

fn encode_field(buf: &mut Vec<u8>, field: &Field<'_>) {
    match field {
        Field::Uint(n) => encode_uint(buf, 0, *n),
        Field::Int(n) if *n >= 0 => encode_uint(buf, 0, *n as u64),
        // CBOR encodes -1 as 0, -2 as 1, etc.
        Field::Int(n) => encode_uint(buf, 1, (-1 - *n) as u64),
        Field::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Field::Null => buf.push(0xf6),
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(u64, Field<'_>)]) {
    let mut pairs: Vec<(Vec<u8>, &Field<'_>)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_uint(&mut key_buf, 0, *k);
            (key_buf, v)
        })
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_field(buf, value);
    }
}

fn field(map: &[(Value, Value)], key: u64) -> Option<&Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
        .map(|(_, v)| v)
}

/// Decode a block previously produced by [`encode_block`].
///
/// The hash is taken as stored; checking it is the job of chain validation.
/// Input that is valid CBOR but not in canonical form is rejected.
pub fn decode_block(bytes: &[u8]) -> Result<Block, CoreError> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;

    let map = match &value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedBlock("expected map".into())),
    };

    let get = |key: u64| field(map, key);

    let height = match get(keys::HEIGHT) {
        Some(Value::Integer(i)) => u64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedBlock("height out of range".into()))?,
        _ => return Err(CoreError::MalformedBlock("missing height".into())),
    };

    let time = match get(keys::TIME) {
        Some(Value::Integer(i)) => i64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedBlock("time out of range".into()))?,
        _ => return Err(CoreError::MalformedBlock("missing time".into())),
    };

    let previous_block_hash = match get(keys::PREVIOUS_HASH) {
        Some(Value::Bytes(b)) => Some(
            BlockHash::try_from(b.as_slice())
                .map_err(|_| CoreError::MalformedBlock("invalid previous hash".into()))?,
        ),
        Some(Value::Null) => None,
        _ => return Err(CoreError::MalformedBlock("missing previous hash".into())),
    };

    let payload = match get(keys::PAYLOAD) {
        Some(Value::Bytes(b)) => b.clone(),
        _ => return Err(CoreError::MalformedBlock("missing payload".into())),
    };

    let hash = match get(keys::HASH) {
        Some(Value::Bytes(b)) => BlockHash::try_from(b.as_slice())
            .map_err(|_| CoreError::MalformedBlock("invalid hash".into()))?,
        _ => return Err(CoreError::MalformedBlock("missing hash".into())),
    };

    let block = Block {
        height,
        time,
        previous_block_hash,
        payload: payload.into(),
        hash,
    };

    if encode_block(&block) != bytes {
        return Err(CoreError::MalformedBlock("non-canonical encoding".into()));
    }

    Ok(block)
}
