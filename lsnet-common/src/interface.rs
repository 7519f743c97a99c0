use bytes::Bytes;
use thiserror::Error;
use tokio::sync::mpsc::{
    self,
    error::{TryRecvError, TrySendError},
    Receiver, Sender,
};

/// Default bound for an interface queue.
pub const DEFAULT_QUEUE_SIZE: usize = 1024;

/// Default link capacity in bps. Informational: the simulator records
/// it but does not rate-limit with it.
pub const DEFAULT_CAPACITY: u64 = 500;

#[derive(Debug, Error)]
pub enum PutError {
    /// The queue is at capacity. The frame is handed back so the
    /// caller can observe and count the drop.
    #[error("queue full")]
    Full(Bytes),
    /// The other half of the attachment was dropped.
    #[error("interface detached")]
    Closed(Bytes),
}

impl PutError {
    /// Returns the frame that could not be enqueued.
    pub fn into_frame(self) -> Bytes {
        match self {
            Self::Full(frame) | Self::Closed(frame) => frame,
        }
    }
}

/// One end of a bounded duplex queue pair.
#[derive(Debug)]
struct Duplex {
    tx: Sender<Bytes>,
    rx: Receiver<Bytes>,
}

impl Duplex {
    /// Non-blocking dequeue. An empty queue (or a detached far side)
    /// is `None`, the normal "nothing to do yet" result.
    fn try_get(&mut self) -> Option<Bytes> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Dequeues the next frame, waiting until one arrives. `None` once
    /// the far side is gone and the queue is drained.
    async fn get(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Non-blocking enqueue. Fails with [`PutError::Full`] when the
    /// queue is at its bound instead of growing it.
    fn try_put(&self, frame: Bytes) -> Result<(), PutError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(frame) => PutError::Full(frame),
            TrySendError::Closed(frame) => PutError::Closed(frame),
        })
    }

    /// Blocking enqueue: suspends until there is room. The
    /// backpressure alternative to [`Duplex::try_put`].
    async fn put(&self, frame: Bytes) -> Result<(), PutError> {
        self.tx.send(frame).await.map_err(|e| PutError::Closed(e.0))
    }
}

/// The node-side half of a link attachment: a bounded inbound queue
/// the node drains and a bounded outbound queue the node fills. The
/// mirrored [`Wire`] half belongs to the transport moving frames
/// between attachments.
///
/// The queue bound is fixed for the life of the attachment and each
/// queue is FIFO; the channel internals are the only synchronisation
/// between the node and the transport.
#[derive(Debug)]
pub struct Interface {
    queues: Duplex,
    capacity: u64,
}

impl Interface {
    /// Non-blocking dequeue from the inbound queue. No side effect
    /// when empty.
    pub fn try_get(&mut self) -> Option<Bytes> {
        self.queues.try_get()
    }

    /// Non-blocking enqueue onto the outbound queue.
    pub fn try_put(&self, frame: Bytes) -> Result<(), PutError> {
        self.queues.try_put(frame)
    }

    /// Enqueues onto the outbound queue, waiting for room: the
    /// backpressure option for callers that want to stall rather than
    /// drop.
    pub async fn put(&self, frame: Bytes) -> Result<(), PutError> {
        self.queues.put(frame).await
    }

    /// The configured link capacity in bps (informational).
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

/// The transport-side half of a link attachment: drains the node's
/// outbound queue and feeds its inbound queue.
#[derive(Debug)]
pub struct Wire {
    queues: Duplex,
}

impl Wire {
    /// Non-blocking dequeue from the node's outbound queue.
    pub fn try_get(&mut self) -> Option<Bytes> {
        self.queues.try_get()
    }

    /// Dequeues from the node's outbound queue, waiting for a frame.
    /// `None` once the node side is gone.
    pub async fn get(&mut self) -> Option<Bytes> {
        self.queues.get().await
    }

    /// Non-blocking enqueue onto the node's inbound queue.
    pub fn try_put(&self, frame: Bytes) -> Result<(), PutError> {
        self.queues.try_put(frame)
    }

    /// Enqueues onto the node's inbound queue, waiting for room.
    pub async fn put(&self, frame: Bytes) -> Result<(), PutError> {
        self.queues.put(frame).await
    }
}

/// Creates a link attachment as a mirrored pair of halves: the
/// [`Interface`] for the owning node and the [`Wire`] for the
/// transport. Both directions are bounded to `max_queue_size` frames.
///
/// # Panics
/// Panics if `max_queue_size` is zero.
pub fn attach(max_queue_size: usize, capacity: u64) -> (Interface, Wire) {
    let (in_tx, in_rx) = mpsc::channel(max_queue_size);
    let (out_tx, out_rx) = mpsc::channel(max_queue_size);

    let interface = Interface { queues: Duplex { tx: out_tx, rx: in_rx }, capacity };
    let wire = Wire { queues: Duplex { tx: in_tx, rx: out_rx } };

    (interface, wire)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn get_on_empty_is_none() {
        let (mut interface, mut wire) = attach(4, DEFAULT_CAPACITY);

        assert!(interface.try_get().is_none());
        assert!(wire.try_get().is_none());
    }

    #[tokio::test]
    async fn fifo_per_queue() {
        let (mut interface, wire) = attach(4, DEFAULT_CAPACITY);

        wire.try_put(Bytes::from_static(b"one")).unwrap();
        wire.try_put(Bytes::from_static(b"two")).unwrap();
        wire.try_put(Bytes::from_static(b"three")).unwrap();

        assert_eq!(interface.try_get().unwrap(), Bytes::from_static(b"one"));
        assert_eq!(interface.try_get().unwrap(), Bytes::from_static(b"two"));
        assert_eq!(interface.try_get().unwrap(), Bytes::from_static(b"three"));
        assert!(interface.try_get().is_none());
    }

    #[tokio::test]
    async fn try_put_on_full_hands_frame_back() {
        let (interface, _wire) = attach(1, DEFAULT_CAPACITY);

        interface.try_put(Bytes::from_static(b"first")).unwrap();

        match interface.try_put(Bytes::from_static(b"second")) {
            Err(PutError::Full(frame)) => assert_eq!(frame, Bytes::from_static(b"second")),
            other => panic!("expected PutError::Full, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocking_put_waits_for_room() {
        let (interface, mut wire) = attach(1, DEFAULT_CAPACITY);

        interface.try_put(Bytes::from_static(b"first")).unwrap();

        let put = tokio::spawn(async move {
            interface.put(Bytes::from_static(b"second")).await.unwrap();
            interface
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!put.is_finished(), "put should suspend while the queue is full");

        assert_eq!(wire.get().await.unwrap(), Bytes::from_static(b"first"));
        put.await.unwrap();
        assert_eq!(wire.get().await.unwrap(), Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn put_to_detached_interface_errors() {
        let (interface, wire) = attach(1, DEFAULT_CAPACITY);
        drop(wire);

        assert!(matches!(
            interface.try_put(Bytes::from_static(b"frame")),
            Err(PutError::Closed(_))
        ));
    }

    #[test]
    fn capacity_is_recorded() {
        let (interface, _wire) = attach(1, 1_000_000);
        assert_eq!(interface.capacity(), 1_000_000);
    }
}
