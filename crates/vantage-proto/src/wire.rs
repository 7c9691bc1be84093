// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Checksummed packet framing and CBOR helpers.
//!
//! Packet layout:
//!
//! ``MAGIC(4) || VERSION(2) || FLAGS(2) || LENGTH(4) || PAYLOAD || CHECKSUM(32)``
//!
//! * PAYLOAD is a CBOR [`OpEnvelope`]
//! * CHECKSUM = blake3-256 over HEADER (first 12 bytes) || PAYLOAD

use blake3::Hasher;
use ciborium::Value;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{Message, OpEnvelope};

/// Protocol magic "VNTG".
pub const MAGIC: [u8; 4] = *b"VNTG";
/// Wire protocol version (big-endian u16).
pub const VERSION: u16 = 0x0001;
/// Reserved flags (zero).
pub const FLAGS: u16 = 0x0000;

/// Bytes before the payload.
pub const HEADER_LEN: usize = 12;
/// Trailing blake3 checksum bytes.
pub const CHECKSUM_LEN: usize = 32;

/// Framing and codec failures.
#[derive(Debug, Error)]
pub enum WireError {
    /// Fewer bytes than the header and payload length announce.
    #[error("incomplete packet: need {needed} bytes, have {available}")]
    Incomplete {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
    /// Header magic mismatch.
    #[error("bad magic")]
    BadMagic,
    /// Unknown protocol version.
    #[error("unsupported version {0:#06x}")]
    UnsupportedVersion(u16),
    /// Checksum mismatch.
    #[error("checksum mismatch")]
    Checksum,
    /// Payload too large for the length field.
    #[error("payload of {0} bytes exceeds the frame limit")]
    TooLarge(usize),
    /// Envelope names an op this build does not know.
    #[error("unknown op {0}")]
    UnknownOp(String),
    /// CBOR encoding failed.
    #[error("cbor encode: {0}")]
    Encode(String),
    /// CBOR decoding failed.
    #[error("cbor decode: {0}")]
    Decode(String),
}

/// Encode to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    let mut out = Vec::new();
    ciborium::into_writer(value, &mut out).map_err(|e| WireError::Encode(e.to_string()))?;
    Ok(out)
}

/// Decode from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    ciborium::from_reader(bytes).map_err(|e| WireError::Decode(e.to_string()))
}

/// A full packet (header + payload + checksum).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Raw header.
    pub header: [u8; HEADER_LEN],
    /// CBOR payload bytes.
    pub payload: Vec<u8>,
    /// blake3 checksum over header||payload.
    pub checksum: [u8; CHECKSUM_LEN],
}

fn checksum(header: &[u8], payload: &[u8]) -> blake3::Hash {
    let mut hasher = Hasher::new();
    hasher.update(header);
    hasher.update(payload);
    hasher.finalize()
}

impl Packet {
    /// Build a packet around a CBOR payload.
    pub fn from_payload(payload: Vec<u8>) -> Result<Self, WireError> {
        let len = u32::try_from(payload.len()).map_err(|_| WireError::TooLarge(payload.len()))?;
        let mut header = [0u8; HEADER_LEN];
        header[0..4].copy_from_slice(&MAGIC);
        header[4..6].copy_from_slice(&VERSION.to_be_bytes());
        header[6..8].copy_from_slice(&FLAGS.to_be_bytes());
        header[8..12].copy_from_slice(&len.to_be_bytes());
        let checksum = *checksum(&header, &payload).as_bytes();
        Ok(Self {
            header,
            payload,
            checksum,
        })
    }

    /// Concatenated packet bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len() + CHECKSUM_LEN);
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.checksum);
        out
    }

    /// Encode an [`OpEnvelope`] into packet bytes.
    pub fn encode_envelope<P: Serialize>(env: &OpEnvelope<P>) -> Result<Vec<u8>, WireError> {
        Ok(Self::from_payload(to_cbor(env)?)?.to_bytes())
    }

    /// Decode one packet from the front of `bytes`, returning the envelope
    /// and the number of bytes consumed.
    pub fn decode_envelope<P: DeserializeOwned>(
        bytes: &[u8],
    ) -> Result<(OpEnvelope<P>, usize), WireError> {
        if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
            return Err(WireError::Incomplete {
                needed: HEADER_LEN + CHECKSUM_LEN,
                available: bytes.len(),
            });
        }
        if bytes[0..4] != MAGIC {
            return Err(WireError::BadMagic);
        }
        let version = u16::from_be_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(WireError::UnsupportedVersion(version));
        }
        let len = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        let total = HEADER_LEN + len + CHECKSUM_LEN;
        if bytes.len() < total {
            return Err(WireError::Incomplete {
                needed: total,
                available: bytes.len(),
            });
        }
        let header = &bytes[..HEADER_LEN];
        let payload = &bytes[HEADER_LEN..HEADER_LEN + len];
        let expected = &bytes[HEADER_LEN + len..total];
        if checksum(header, payload).as_bytes() != expected {
            return Err(WireError::Checksum);
        }
        Ok((from_cbor(payload)?, total))
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, WireError> {
    Value::serialized(value).map_err(|e| WireError::Encode(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T, WireError> {
    value
        .deserialized()
        .map_err(|e| WireError::Decode(e.to_string()))
}

/// Encode a [`Message`] into a packet with the provided logical timestamp.
pub fn encode_message(msg: &Message, ts: u64) -> Result<Vec<u8>, WireError> {
    let payload = match msg {
        Message::SceneAlteration(p) => to_value(p)?,
        Message::FlyTo(p) => to_value(p)?,
        Message::ReplaceCamera(p) => to_value(p)?,
        Message::HitItems(p) => to_value(p)?,
        Message::GetStencilBuffer(p) => to_value(p)?,
        Message::DrawFrame(p) => to_value(p)?,
        Message::HitItemsResult(p) => to_value(p)?,
        Message::StencilBufferResult(p) => to_value(p)?,
        Message::Event(p) => to_value(p)?,
        Message::Error(p) => to_value(p)?,
    };
    let env = OpEnvelope {
        op: msg.op_name().to_string(),
        ts,
        payload,
    };
    Packet::encode_envelope(&env)
}

/// Decode bytes into `(Message, ts, bytes_consumed)`.
pub fn decode_message(bytes: &[u8]) -> Result<(Message, u64, usize), WireError> {
    let (env, used) = Packet::decode_envelope::<Value>(bytes)?;
    let p = &env.payload;
    let msg = match env.op.as_str() {
        "scene_alteration" => Message::SceneAlteration(from_value(p)?),
        "fly_to" => Message::FlyTo(from_value(p)?),
        "replace_camera" => Message::ReplaceCamera(from_value(p)?),
        "hit_items" => Message::HitItems(from_value(p)?),
        "get_stencil_buffer" => Message::GetStencilBuffer(from_value(p)?),
        "draw_frame" => Message::DrawFrame(from_value(p)?),
        "hit_items_result" => Message::HitItemsResult(from_value(p)?),
        "stencil_buffer_result" => Message::StencilBufferResult(from_value(p)?),
        "event" => Message::Event(from_value(p)?),
        "error" => Message::Error(from_value(p)?),
        other => return Err(WireError::UnknownOp(other.to_string())),
    };
    Ok((msg, env.ts, used))
}
