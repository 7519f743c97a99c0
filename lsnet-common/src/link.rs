use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::interface::Wire;

/// A bidirectional frame shuttle between two link attachments: each
/// side's outbound frames are moved into the other side's inbound
/// queue.
///
/// The shuttle uses blocking puts, so a slow consumer backpressures
/// the wire rather than losing frames; drop policy lives with the
/// nodes, not the transport.
#[derive(Debug)]
pub struct Link {
    a: Wire,
    b: Wire,
}

impl Link {
    pub fn new(a: Wire, b: Wire) -> Self {
        Self { a, b }
    }

    /// Moves frames in both directions until the token is cancelled or
    /// either side detaches.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("link stopped");
                    return;
                }
                frame = self.a.get() => {
                    let Some(frame) = frame else {
                        debug!("link: side a detached");
                        return;
                    };
                    trace!(len = frame.len(), "link: a -> b");
                    if self.b.put(frame).await.is_err() {
                        debug!("link: side b detached");
                        return;
                    }
                }
                frame = self.b.get() => {
                    let Some(frame) = frame else {
                        debug!("link: side b detached");
                        return;
                    };
                    trace!(len = frame.len(), "link: b -> a");
                    if self.a.put(frame).await.is_err() {
                        debug!("link: side a detached");
                        return;
                    }
                }
            }
        }
    }
}
