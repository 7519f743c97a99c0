//! Nodes of the lsnet simulator: hosts that originate and consume
//! application packets, and routers that forward them with MPLS-style
//! label switching.
//!
//! Each node runs its processing loop as an independent task; the only
//! shared state between nodes is the bounded interface queues from
//! [`lsnet_common`].

use std::time::Duration;

mod host;
mod router;
mod stats;
mod tables;

pub use host::{Host, HostError};
pub use router::{Router, RouterError};
pub use stats::RouterStats;
pub use tables::{DecapTable, EncapTable, FlowKey, FwdTable, RouterTables};

/// How long an idle polling pass sleeps before trying again.
pub(crate) const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);
