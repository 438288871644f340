//! Responder role: answers probes and logs each interaction

pub mod answer;
pub mod error;
pub mod run;
pub mod stats;

pub use answer::{answer_probe, Answer, Contact};
pub use error::{ResponderError, Result};
pub use run::Responder;
pub use stats::ResponderStats;
