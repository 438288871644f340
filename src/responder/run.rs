use crate::clock::Clock;
use crate::protocol::{Probe, RECV_BUFFER_SIZE};
use crate::responder::answer::{answer_probe, Answer, Contact};
use crate::responder::error::{ResponderError, Result};
use crate::responder::stats::ResponderStats;
use std::future::Future;
use std::io::ErrorKind;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

/// Long-running probe responder bound to one UDP endpoint
pub struct Responder<C: Clock> {
    socket: UdpSocket,
    clock: C,
    stats: ResponderStats,
}

impl<C: Clock> Responder<C> {
    /// Bind the responder socket; fails when the address is unavailable.
    pub async fn bind(addr: &str, clock: C) -> Result<Self> {
        debug!(addr = addr, "Binding UDP socket");
        let socket = UdpSocket::bind(addr).await.map_err(|e| {
            warn!(error = %e, "Failed to bind socket");
            if e.kind() == ErrorKind::AddrInUse {
                ResponderError::Socket(format!(
                    "Failed to bind to {}: Address already in use. Try a different port or ensure no other process is using it.",
                    addr
                ))
            } else {
                ResponderError::Socket(format!("Failed to bind to {}: {}", addr, e))
            }
        })?;
        debug!("Socket bound successfully");

        Ok(Self {
            socket,
            clock,
            stats: ResponderStats::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn stats(&self) -> &ResponderStats {
        &self.stats
    }

    /// Answer one received datagram.
    ///
    /// Malformed datagrams are counted and dropped without a reply.
    pub async fn handle_datagram(
        &mut self,
        datagram: &[u8],
        peer: SocketAddr,
        recv_time: u64,
    ) -> Option<Answer> {
        let probe = match Probe::decode(datagram) {
            Ok(probe) => probe,
            Err(e) => {
                self.stats.increment_malformed();
                warn!(peer = %peer, error = %e, "Dropping malformed probe");
                return None;
            }
        };

        let answer = answer_probe(&probe, recv_time);
        if let Err(e) = self.socket.send_to(&answer.reply.encode(), peer).await {
            self.stats.increment_error();
            error!(error = %e, peer = %peer, "Failed to send reply");
            return None;
        }
        self.stats.increment_sent();

        match answer.contact {
            Contact::First => debug!(
                peer = %peer,
                recv_time = recv_time,
                computed_offset = answer.reply.computed_offset,
                "First contact"
            ),
            Contact::Returning {
                reported_offset,
                skew,
            } => debug!(
                peer = %peer,
                recv_time = recv_time,
                reported_offset = reported_offset,
                computed_offset = answer.reply.computed_offset,
                skew = skew,
                "Probe answered"
            ),
        }
        println!("{}", answer.interaction_line());

        Some(answer)
    }

    /// Receive and answer probes one at a time until `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<ResponderStats>
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut buf = [0u8; RECV_BUFFER_SIZE];

        info!(address = ?self.socket.local_addr().ok(), "Responder listening");

        loop {
            let received = tokio::select! {
                biased;
                () = &mut shutdown => break,
                received = self.socket.recv_from(&mut buf) => received,
            };
            let recv_time = self.clock.now_micros();

            match received {
                Ok((len, peer)) => {
                    self.stats.increment_received();
                    self.handle_datagram(&buf[..len], peer, recv_time).await;
                }
                Err(e) => {
                    // ICMP errors from earlier replies surface here on some platforms.
                    self.stats.increment_error();
                    warn!(error = %e, "Failed to receive probe");
                }
            }
        }

        info!(
            packets_received = self.stats.packets_received,
            replies_sent = self.stats.replies_sent,
            malformed = self.stats.malformed,
            errors = self.stats.errors,
            uptime_secs = self.stats.elapsed().as_secs(),
            "Responder stopped"
        );

        Ok(self.stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::protocol::{ProbeReply, NO_PRIOR_OFFSET};

    #[tokio::test]
    async fn test_bind_ephemeral() {
        let responder = Responder::bind("127.0.0.1:0", MockClock::new())
            .await
            .unwrap();
        assert_ne!(responder.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_in_use_fails() {
        let first = Responder::bind("127.0.0.1:0", MockClock::new())
            .await
            .unwrap();
        let addr = first.local_addr().unwrap().to_string();
        let second = Responder::bind(&addr, MockClock::new()).await;
        assert!(matches!(second, Err(ResponderError::Socket(_))));
    }

    #[tokio::test]
    async fn test_handle_datagram_replies() {
        let mut responder = Responder::bind("127.0.0.1:0", MockClock::new())
            .await
            .unwrap();
        let peer = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let peer_addr = peer.local_addr().unwrap();

        let probe = Probe::new(1_000_000, NO_PRIOR_OFFSET);
        let answer = responder
            .handle_datagram(&probe.encode(), peer_addr, 1_000_050)
            .await
            .unwrap();
        assert_eq!(answer.contact, Contact::First);

        let mut buf = [0u8; 64];
        let (len, _) = peer.recv_from(&mut buf).await.unwrap();
        assert_eq!(
            ProbeReply::decode(&buf[..len]).unwrap(),
            ProbeReply::new(1_000_050, 50)
        );
        assert_eq!(responder.stats().replies_sent, 1);
    }

    #[tokio::test]
    async fn test_handle_datagram_drops_garbage() {
        let mut responder = Responder::bind("127.0.0.1:0", MockClock::new())
            .await
            .unwrap();
        let peer_addr: SocketAddr = "127.0.0.1:9".parse().unwrap();

        let answer = responder
            .handle_datagram(&[0xDE, 0xAD, 0xBE, 0xEF], peer_addr, 1)
            .await;
        assert!(answer.is_none());
        assert_eq!(responder.stats().malformed, 1);
        assert_eq!(responder.stats().replies_sent, 0);
    }
}
