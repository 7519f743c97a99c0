use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use lsnet_common::{attach, Interface, PutError, Wire};
use lsnet_wire::{
    frame::{self, FrameKind, LinkFrame},
    label::{self, LabelFrame, LABEL_WIDTH},
    packet::{self, Packet},
};

use crate::{
    stats::RouterStats,
    tables::{FlowKey, RouterTables},
    IDLE_POLL_INTERVAL,
};

/// Errors that are fatal to a router's pipeline. Everything else
/// (full queues, table misses) is absorbed as a counted drop.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("envelope error: {0}")]
    Frame(#[from] frame::Error),
    #[error("packet decode error: {0}")]
    Packet(#[from] packet::Error),
    #[error("label frame decode error: {0}")]
    Label(#[from] label::Error),
}

/// A multi-interface label-switching router.
///
/// Owns one [`Interface`] per link attachment and the three lookup
/// tables captured at construction. The pipeline polls the inbound
/// queues round-robin, classifies each frame as a network packet or a
/// label-switched frame, and re-enqueues the result on the egress
/// interface the tables pick.
#[derive(Debug)]
pub struct Router {
    name: String,
    interfaces: Vec<Interface>,
    tables: RouterTables,
    stats: Arc<RouterStats>,
}

impl Router {
    /// Builds a router with one interface per capacity entry, every
    /// queue bounded to `max_queue_size`. Returns the wire ends in
    /// interface order for topology wiring.
    pub fn new(
        name: impl Into<String>,
        intf_capacities: &[u64],
        tables: RouterTables,
        max_queue_size: usize,
    ) -> (Self, Vec<Wire>) {
        let mut interfaces = Vec::with_capacity(intf_capacities.len());
        let mut wires = Vec::with_capacity(intf_capacities.len());

        for &capacity in intf_capacities {
            let (interface, wire) = attach(max_queue_size, capacity);
            interfaces.push(interface);
            wires.push(wire);
        }

        let router = Self {
            name: name.into(),
            interfaces,
            tables,
            stats: Arc::new(RouterStats::default()),
        };

        (router, wires)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pipeline counters, shared with the router task.
    pub fn stats(&self) -> Arc<RouterStats> {
        Arc::clone(&self.stats)
    }

    /// One round-robin pass over the inbound queues: ascending index
    /// order, at most one frame per interface. Returns whether any
    /// frame was pulled; a fully idle pass is a no-op tick.
    pub fn process_pass(&mut self) -> Result<bool, RouterError> {
        let mut busy = false;

        for index in 0..self.interfaces.len() {
            let Some(bytes) = self.interfaces[index].try_get() else {
                continue;
            };

            busy = true;
            self.process_frame(&bytes, index)?;
        }

        Ok(busy)
    }

    /// Classifies one inbound frame and runs it through the pipeline.
    /// An unrecognized envelope is a protocol violation and
    /// propagates; it is a bug elsewhere in the topology, not loss.
    fn process_frame(&mut self, bytes: &[u8], in_intf: usize) -> Result<(), RouterError> {
        let envelope = LinkFrame::decode(bytes)?;

        match envelope.kind() {
            FrameKind::Network => {
                let pkt = Packet::decode(envelope.payload())?;
                self.process_packet(pkt, in_intf);
            }
            FrameKind::Mpls => {
                let payload = envelope.payload();

                // Re-derive the label from the leading field and hand it to
                // the decoder as the override, the same path a re-labeling
                // hop takes. The override always wins.
                let field = payload
                    .get(..LABEL_WIDTH)
                    .ok_or(label::Error::Truncated(payload.len()))?;
                let new_label = label::parse_label(field)?;
                let frame = LabelFrame::decode(payload, Some(new_label))?;

                self.process_label_frame(frame, in_intf);
            }
        }

        Ok(())
    }

    /// Ingress: the encap table assigns the packet's initial label and
    /// the frame continues down the label-switched path. A missing
    /// flow entry drops the packet.
    fn process_packet(&mut self, pkt: Packet, in_intf: usize) {
        let key = FlowKey::new(pkt.src(), pkt.dst(), pkt.priority());

        let Some(new_label) = self.tables.encap.get(&key) else {
            self.stats.increment_dropped_lookup();
            warn!(router = %self.name, ?key, "no encap entry, dropping packet");
            return;
        };

        debug!(router = %self.name, label = new_label, "encapsulating packet");
        self.process_label_frame(LabelFrame::new(pkt, new_label), in_intf);
    }

    /// Label switch: the forwarding table picks the egress interface
    /// and the decap table decides whether the label wrapper comes off
    /// there. A full egress queue is a drop, never a stall.
    fn process_label_frame(&mut self, frame: LabelFrame, in_intf: usize) {
        let switch_label = frame.label();

        let Some(out_intf) = self.tables.fwd.get(switch_label) else {
            self.stats.increment_dropped_lookup();
            warn!(router = %self.name, label = switch_label, "no forwarding entry, dropping frame");
            return;
        };

        let Some(decap) = self.tables.decap.must_decap(out_intf) else {
            self.stats.increment_dropped_lookup();
            warn!(router = %self.name, out_intf, "no decap entry, dropping frame");
            return;
        };

        let Some(egress) = self.interfaces.get(out_intf) else {
            self.stats.increment_dropped_lookup();
            warn!(router = %self.name, out_intf, "egress interface does not exist, dropping frame");
            return;
        };

        let envelope = if decap {
            LinkFrame::network(frame.into_packet().encode())
        } else {
            LinkFrame::mpls(frame.encode())
        };
        let kind = envelope.kind();

        match egress.try_put(envelope.encode()) {
            Ok(()) => {
                self.stats.increment_forwarded();
                debug!(
                    router = %self.name,
                    %kind,
                    from = in_intf,
                    to = out_intf,
                    "forwarded frame"
                );
            }
            Err(PutError::Full(_)) => {
                self.stats.increment_dropped_full();
                warn!(router = %self.name, from = in_intf, to = out_intf, "egress queue full, dropping frame");
            }
            Err(PutError::Closed(_)) => {
                // Shutdown path: the far side of the link is gone.
                debug!(router = %self.name, to = out_intf, "egress interface detached, dropping frame");
            }
        }
    }

    /// Runs the pipeline until the token is cancelled. The stop signal
    /// is observed between passes; in-flight frames are not flushed on
    /// stop. Only a protocol violation terminates the loop early.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), RouterError> {
        debug!(router = %self.name, interfaces = self.interfaces.len(), "starting");

        loop {
            let busy = match self.process_pass() {
                Ok(busy) => busy,
                Err(e) => {
                    error!(router = %self.name, %e, "fatal protocol violation");
                    return Err(e);
                }
            };

            if cancel.is_cancelled() {
                debug!(router = %self.name, "stopping");
                return Ok(());
            }

            if busy {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(IDLE_POLL_INTERVAL).await;
            }
        }
    }
}
