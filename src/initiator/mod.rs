//! Initiator role: sends probes, derives per-exchange metrics and summarises
//! the run

pub mod aggregate;
pub mod error;
pub mod metrics;
pub mod report;
pub mod run;
pub mod session;
pub mod socket;

pub use aggregate::{median, Aggregate, Summary};
pub use error::{InitiatorError, Result};
pub use metrics::{gcd, AsymmetryRatio, ExchangeMetrics};
pub use report::Reporter;
pub use run::{Initiator, RunOutcome};
pub use session::{Exchange, PendingExchange, Session};
pub use socket::InitiatorSocket;
