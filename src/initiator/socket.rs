use crate::initiator::error::{InitiatorError, Result};
use crate::protocol::{Probe, ProbeReply, RECV_BUFFER_SIZE};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, warn};

/// UDP socket connected to a single responder
#[derive(Debug)]
pub struct InitiatorSocket {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl InitiatorSocket {
    /// Resolve `remote` (host:port), bind an ephemeral local port of the same
    /// address family and connect to the first resolved address.
    pub async fn connect(remote: &str) -> Result<Self> {
        debug!(remote = remote, "Resolving responder address");
        let peer = lookup_host(remote)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to resolve responder");
                InitiatorError::Resolve(format!("{}: {}", remote, e))
            })?
            .next()
            .ok_or_else(|| InitiatorError::Resolve(format!("{}: no addresses", remote)))?;

        let local: SocketAddr = if peer.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await.map_err(|e| {
            warn!(error = %e, "Failed to bind socket");
            InitiatorError::Socket(format!("Failed to bind to {}: {}", local, e))
        })?;
        socket.connect(peer).await.map_err(|e| {
            warn!(error = %e, "Failed to connect socket");
            InitiatorError::Socket(format!("Failed to connect to {}: {}", peer, e))
        })?;

        debug!(peer = %peer, "Socket connected successfully");
        Ok(Self { socket, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub async fn send_probe(&self, probe: &Probe) -> Result<usize> {
        let buf = probe.encode();
        let bytes_sent = self.socket.send(&buf).await.map_err(|e| {
            warn!(error = %e, "Failed to send probe");
            InitiatorError::Io(e)
        })?;
        debug!(
            bytes_sent = bytes_sent,
            send_time = probe.send_time,
            "Probe sent"
        );
        Ok(bytes_sent)
    }

    /// Wait up to `timeout` for one reply datagram.
    pub async fn recv_reply(&self, timeout: Duration) -> Result<ProbeReply> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        let len = tokio::time::timeout(timeout, self.socket.recv(&mut buf))
            .await
            .map_err(|_| InitiatorError::Timeout(timeout))?
            .map_err(|e| {
                debug!(error = %e, "Failed to receive reply");
                InitiatorError::Io(e)
            })?;
        let reply = ProbeReply::decode(&buf[..len])?;
        debug!(
            recv_time = reply.recv_time,
            computed_offset = reply.computed_offset,
            bytes_received = len,
            "Reply received"
        );
        Ok(reply)
    }
}
