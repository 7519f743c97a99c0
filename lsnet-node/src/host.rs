use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use lsnet_common::{attach, Interface, PutError, Wire, DEFAULT_CAPACITY, DEFAULT_QUEUE_SIZE};
use lsnet_wire::{
    frame::{self, FrameKind, LinkFrame},
    packet::{self, Packet, SRC_WIDTH},
};

use crate::IDLE_POLL_INTERVAL;

#[derive(Debug, Error)]
pub enum HostError {
    /// The outbound queue is full; the send is refused so the caller
    /// sees it, never silently lost.
    #[error("outbound queue full")]
    QueueFull,
    #[error("interface detached")]
    Detached,
    /// Hosts only ever consume `Network` envelopes; anything else
    /// reaching a host is a protocol violation.
    #[error("unexpected {0} frame at host")]
    UnexpectedFrame(FrameKind),
    #[error("envelope error: {0}")]
    Frame(#[from] frame::Error),
    #[error("packet decode error: {0}")]
    Packet(#[from] packet::Error),
}

/// An endpoint with a single link attachment: originates packets with
/// [`Host::send`] and drains its inbound queue with [`Host::receive`].
#[derive(Debug)]
pub struct Host {
    addr: String,
    interface: Interface,
}

impl Host {
    /// Creates a host with a default-sized attachment, returning the
    /// wire end for topology wiring.
    ///
    /// # Panics
    /// Panics if the address exceeds the source id wire field.
    pub fn new(addr: impl Into<String>) -> (Self, Wire) {
        let addr = addr.into();
        assert!(addr.len() <= SRC_WIDTH, "host address too long, max {SRC_WIDTH} characters");

        let (interface, wire) = attach(DEFAULT_QUEUE_SIZE, DEFAULT_CAPACITY);

        (Self { addr, interface }, wire)
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Builds a packet from this host's address and enqueues it for
    /// transmission in a `Network` envelope.
    pub fn send(
        &self,
        dst: impl Into<String>,
        payload: Bytes,
        priority: u8,
    ) -> Result<(), HostError> {
        let pkt = Packet::new(dst, self.addr.clone(), payload, priority);
        info!(host = %self.addr, dst = pkt.dst(), priority, "sending packet");

        let envelope = LinkFrame::network(pkt.encode());
        self.interface.try_put(envelope.encode()).map_err(|e| match e {
            PutError::Full(_) => HostError::QueueFull,
            PutError::Closed(_) => HostError::Detached,
        })
    }

    /// One receive tick: a non-blocking poll of the inbound queue.
    /// An empty queue is `Ok(None)`, the normal idle result.
    pub fn receive(&mut self) -> Result<Option<Packet>, HostError> {
        let Some(bytes) = self.interface.try_get() else {
            return Ok(None);
        };

        let envelope = LinkFrame::decode(&bytes)?;
        if envelope.kind() != FrameKind::Network {
            return Err(HostError::UnexpectedFrame(envelope.kind()));
        }

        let pkt = Packet::decode(envelope.payload())?;
        info!(host = %self.addr, src = pkt.src(), len = pkt.payload().len(), "received packet");

        Ok(Some(pkt))
    }

    /// Cooperative receive loop: polls the inbound queue and hands
    /// packets up through `delivery` until the token is cancelled
    /// (checked between ticks). Only a protocol violation ends the
    /// loop with an error.
    pub async fn run(
        mut self,
        cancel: CancellationToken,
        delivery: mpsc::Sender<Packet>,
    ) -> Result<(), HostError> {
        debug!(host = %self.addr, "starting");

        loop {
            match self.receive() {
                Ok(Some(pkt)) => {
                    if delivery.send(pkt).await.is_err() {
                        debug!(host = %self.addr, "application went away, stopping");
                        return Ok(());
                    }
                }
                Ok(None) => tokio::time::sleep(IDLE_POLL_INTERVAL).await,
                Err(e) => {
                    error!(host = %self.addr, %e, "fatal protocol violation");
                    return Err(e);
                }
            }

            if cancel.is_cancelled() {
                debug!(host = %self.addr, "stopping");
                return Ok(());
            }
        }
    }
}
