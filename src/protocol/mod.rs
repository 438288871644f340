//! Protocol module for the asymmetry probe

pub mod error;
pub mod message;

pub use error::{ProtocolError, Result as ProtocolResult};
pub use message::{
    decode_probe, decode_reply, encode_probe, encode_reply, Probe, ProbeReply, DEFAULT_PORT,
    NO_PRIOR_OFFSET, PACKET_SIZE, RECV_BUFFER_SIZE,
};
