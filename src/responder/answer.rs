//! Per-probe reply computation and interaction line

use crate::protocol::{Probe, ProbeReply};

/// What the responder learned about the peer from one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The probe carried the sentinel: no prior offset to compare against
    First,
    Returning {
        reported_offset: i32,
        /// `reported_offset - computed_offset`
        skew: i64,
    },
}

/// Reply to send back plus what to log about the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub reply: ProbeReply,
    pub contact: Contact,
}

/// Build the reply for `probe` received at `recv_time` (microseconds).
///
/// First contact is detected solely from the sentinel in the probe.
pub fn answer_probe(probe: &Probe, recv_time: u64) -> Answer {
    let distance = (i128::from(recv_time) - i128::from(probe.send_time)).unsigned_abs();
    let computed_offset = i32::try_from(distance).unwrap_or(i32::MAX);
    let reply = ProbeReply::new(recv_time, computed_offset);

    let contact = if probe.is_first_contact() {
        Contact::First
    } else {
        Contact::Returning {
            reported_offset: probe.reported_offset,
            skew: i64::from(probe.reported_offset) - i64::from(computed_offset),
        }
    };

    Answer { reply, contact }
}

impl Answer {
    /// Console line for the interaction; first contact gets a heading line.
    pub fn interaction_line(&self) -> String {
        let recv_time = self.reply.recv_time;
        let computed_offset = self.reply.computed_offset;
        match self.contact {
            Contact::First => format!(
                "---- Initial request:\n   Received at: {}, Offset A: N/A, Offset B: {}, Skew: N/A",
                recv_time, computed_offset
            ),
            Contact::Returning {
                reported_offset,
                skew,
            } => format!(
                "Received at: {}, Offset A: {}, Offset B: {}, Skew: {}",
                recv_time, reported_offset, computed_offset, skew
            ),
        }
    }
}
