use crate::clock::Clock;
use crate::initiator::aggregate::Aggregate;
use crate::initiator::error::{InitiatorError, Result};
use crate::initiator::report::Reporter;
use crate::initiator::session::{Exchange, Session};
use crate::initiator::socket::InitiatorSocket;
use crate::protocol::ProbeReply;
use std::future::Future;
use std::io::ErrorKind;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Results of one initiator run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub aggregate: Aggregate,
    /// Rounds whose probe was sent
    pub attempted: usize,
    pub lost: usize,
    pub cancelled: bool,
}

impl RunOutcome {
    pub fn completed(&self) -> usize {
        self.aggregate.len()
    }
}

enum Round {
    Reply(Result<ProbeReply>),
    Cancelled,
}

/// Drives a fixed number of sequential probe exchanges against one responder
pub struct Initiator<C: Clock> {
    socket: InitiatorSocket,
    session: Session<C>,
    exchanges: usize,
    timeout: Duration,
}

impl<C: Clock> Initiator<C> {
    pub fn new(socket: InitiatorSocket, clock: C, exchanges: usize, timeout: Duration) -> Self {
        Self {
            socket,
            session: Session::new(clock),
            exchanges,
            timeout,
        }
    }

    /// Complete a single round: send one probe and wait for its reply.
    ///
    /// Returns `Ok(None)` when the round is lost (timeout, refused or
    /// malformed reply) and `InitiatorError::Cancelled` once `shutdown`
    /// resolves. `shutdown` must not be polled again after that.
    pub async fn exchange_once<F>(&mut self, shutdown: &mut F) -> Result<Option<Exchange>>
    where
        F: Future<Output = ()> + Unpin,
    {
        let pending = self.session.begin();
        self.socket.send_probe(&pending.probe).await?;

        let round = tokio::select! {
            biased;
            reply = self.socket.recv_reply(self.timeout) => Round::Reply(reply),
            () = shutdown => Round::Cancelled,
        };

        match round {
            Round::Reply(Ok(reply)) => Ok(Some(self.session.complete(pending, reply))),
            Round::Reply(Err(InitiatorError::Timeout(timeout))) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "Reply timeout");
                Ok(None)
            }
            Round::Reply(Err(InitiatorError::Io(e)))
                if e.kind() == ErrorKind::ConnectionRefused =>
            {
                warn!(peer = %self.socket.peer(), "Responder refused the probe");
                Ok(None)
            }
            Round::Reply(Err(InitiatorError::Protocol(e))) => {
                warn!(error = %e, "Discarding malformed reply");
                Ok(None)
            }
            Round::Reply(Err(e)) => Err(e),
            Round::Cancelled => Err(InitiatorError::Cancelled),
        }
    }

    /// Run all rounds, printing a line per round, until done or `shutdown`
    /// resolves.
    ///
    /// Exchanges completed before a cancellation are kept in the outcome.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<RunOutcome>
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut aggregate = Aggregate::new();
        let mut attempted = 0usize;
        let mut lost = 0usize;
        let mut cancelled = false;

        for index in 0..self.exchanges {
            attempted += 1;
            match self.exchange_once(&mut shutdown).await {
                Ok(Some(exchange)) => {
                    aggregate.record(&exchange.metrics);
                    Reporter::print_exchange(index, &exchange);
                }
                Ok(None) => {
                    lost += 1;
                    Reporter::print_skipped(index);
                }
                Err(InitiatorError::Cancelled) => {
                    cancelled = true;
                    Reporter::print_cancelled();
                    break;
                }
                Err(e) => {
                    return Err(InitiatorError::Socket(format!(
                        "Exchange run interrupted after {} rounds ({} completed, {} lost): {}",
                        attempted - 1,
                        aggregate.len(),
                        lost,
                        e
                    )));
                }
            }
        }

        info!(
            attempted = attempted,
            completed = aggregate.len(),
            lost = lost,
            cancelled = cancelled,
            "Exchange run finished"
        );

        Ok(RunOutcome {
            aggregate,
            attempted,
            lost,
            cancelled,
        })
    }
}
