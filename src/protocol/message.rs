use crate::protocol::error::{ProtocolError, Result};
use tracing::debug;

/// Size of a packet in bytes: 8-byte timestamp followed by a 4-byte value
pub const PACKET_SIZE: usize = 12;

/// Offset value carried by the first probe of a run ("no prior offset known")
pub const NO_PRIOR_OFFSET: i32 = 0x7FFF_FFFF;

/// UDP port used by both roles unless configured otherwise
pub const DEFAULT_PORT: u16 = 12345;

/// Receive buffer size; larger than a packet so oversized datagrams are
/// rejected instead of truncated
pub const RECV_BUFFER_SIZE: usize = 1024;

const TIMESTAMP_LEN: usize = 8;

/// Initiator-to-responder datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// Initiator clock at send time, in microseconds
    pub send_time: u64,
    /// Local offset computed from the previous reply, or [`NO_PRIOR_OFFSET`]
    pub reported_offset: i32,
}

/// Responder-to-initiator datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReply {
    /// Responder clock at receive time, in microseconds
    pub recv_time: u64,
    /// `|recv_time - probe.send_time|` as seen by the responder
    pub computed_offset: i32,
}

impl Probe {
    pub fn new(send_time: u64, reported_offset: i32) -> Self {
        Self {
            send_time,
            reported_offset,
        }
    }

    /// True when the probe carries the first-contact sentinel.
    pub fn is_first_contact(&self) -> bool {
        self.reported_offset == NO_PRIOR_OFFSET
    }

    pub fn encode(&self) -> [u8; PACKET_SIZE] {
        encode_probe(self.send_time, self.reported_offset)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (send_time, reported_offset) = decode_probe(bytes)?;
        Ok(Self {
            send_time,
            reported_offset,
        })
    }
}

impl ProbeReply {
    pub fn new(recv_time: u64, computed_offset: i32) -> Self {
        Self {
            recv_time,
            computed_offset,
        }
    }

    pub fn encode(&self) -> [u8; PACKET_SIZE] {
        encode_reply(self.recv_time, self.computed_offset)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (recv_time, computed_offset) = decode_reply(bytes)?;
        Ok(Self {
            recv_time,
            computed_offset,
        })
    }
}

pub fn encode_probe(send_time: u64, reported_offset: i32) -> [u8; PACKET_SIZE] {
    encode_fields(send_time, reported_offset)
}

pub fn decode_probe(bytes: &[u8]) -> Result<(u64, i32)> {
    decode_fields(bytes)
}

/// Replies reuse the probe layout with different field meanings.
pub fn encode_reply(recv_time: u64, computed_offset: i32) -> [u8; PACKET_SIZE] {
    encode_fields(recv_time, computed_offset)
}

pub fn decode_reply(bytes: &[u8]) -> Result<(u64, i32)> {
    decode_fields(bytes)
}

fn encode_fields(timestamp: u64, value: i32) -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    buf[..TIMESTAMP_LEN].copy_from_slice(&timestamp.to_be_bytes());
    buf[TIMESTAMP_LEN..].copy_from_slice(&value.to_be_bytes());
    buf
}

fn decode_fields(bytes: &[u8]) -> Result<(u64, i32)> {
    if bytes.len() != PACKET_SIZE {
        debug!(
            expected = PACKET_SIZE,
            actual = bytes.len(),
            "Invalid packet size"
        );
        return Err(ProtocolError::MalformedPacket {
            expected: PACKET_SIZE,
            actual: bytes.len(),
        });
    }

    let mut timestamp = [0u8; TIMESTAMP_LEN];
    timestamp.copy_from_slice(&bytes[..TIMESTAMP_LEN]);
    let mut value = [0u8; PACKET_SIZE - TIMESTAMP_LEN];
    value.copy_from_slice(&bytes[TIMESTAMP_LEN..]);

    Ok((u64::from_be_bytes(timestamp), i32::from_be_bytes(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_encode_decode() {
        let original = Probe::new(1_000_000, NO_PRIOR_OFFSET);
        let encoded = original.encode();
        let decoded = Probe::decode(&encoded).unwrap();
        assert_eq!(original, decoded);
        assert!(decoded.is_first_contact());
    }

    #[test]
    fn test_network_byte_order() {
        let encoded = encode_probe(0x0102_0304_0506_0708, -2);
        assert_eq!(
            encoded,
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0xFF, 0xFF, 0xFF, 0xFE]
        );
    }

    #[test]
    fn test_reply_shares_probe_layout() {
        let reply = ProbeReply::new(1_000_050, 50);
        let (timestamp, value) = decode_probe(&reply.encode()).unwrap();
        assert_eq!(timestamp, 1_000_050);
        assert_eq!(value, 50);
    }

    #[test]
    fn test_sentinel_bytes() {
        let encoded = encode_probe(0, NO_PRIOR_OFFSET);
        assert_eq!(&encoded[8..], &[0x7F, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_packet_invalid_size() {
        let buf = [0u8; 4];
        assert_eq!(
            Probe::decode(&buf),
            Err(ProtocolError::MalformedPacket {
                expected: PACKET_SIZE,
                actual: 4
            })
        );
    }

    #[test]
    fn test_packet_oversized_is_rejected() {
        let buf = [0u8; PACKET_SIZE + 1];
        assert!(ProbeReply::decode(&buf).is_err());
        assert!(decode_reply(&[]).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_probe_roundtrip(send_time in any::<u64>(), offset in any::<i32>()) {
            let decoded = decode_probe(&encode_probe(send_time, offset)).unwrap();
            prop_assert_eq!(decoded, (send_time, offset));
        }

        #[test]
        fn test_reply_roundtrip(recv_time in any::<u64>(), offset in 0i32..=i32::MAX) {
            let reply = ProbeReply::new(recv_time, offset);
            prop_assert_eq!(ProbeReply::decode(&reply.encode()).unwrap(), reply);
        }

        #[test]
        fn test_wrong_length_rejected(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            prop_assume!(bytes.len() != PACKET_SIZE);
            let is_malformed = matches!(
                decode_probe(&bytes),
                Err(ProtocolError::MalformedPacket { .. })
            );
            prop_assert!(is_malformed);
        }
    }
}
