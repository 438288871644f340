//! Asymmetry - clock offset asymmetry probe
//!
//! This library provides the two interoperating roles of the asymmetry probe:
//! an initiator that sends timestamped probes and summarises the measured
//! offset split, and a responder that answers probes with its own receive
//! time and a locally computed offset.

pub mod clock;
pub mod config;
pub mod initiator;
pub mod logging;
pub mod protocol;
pub mod responder;
