//! A small packet-switched network simulator: hosts originate and
//! consume application packets, routers forward them with MPLS-style
//! label switching over bounded per-interface queues.
//!
//! ```no_run
//! use bytes::Bytes;
//! use lsnet::{FlowKey, Host, Link, Router, RouterTables};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (h1, h1_wire) = Host::new("1");
//! let (h2, h2_wire) = Host::new("2");
//!
//! let mut tables = RouterTables::default();
//! tables.encap.insert(FlowKey::new("1", "2", 0), 7);
//! tables.fwd.insert(7, 1);
//! tables.decap.insert(1, 0);
//! let (router, mut wires) = Router::new("r1", &[500, 500], tables, 8);
//!
//! let cancel = CancellationToken::new();
//! tokio::spawn(Link::new(h1_wire, wires.remove(0)).run(cancel.clone()));
//! tokio::spawn(Link::new(wires.remove(0), h2_wire).run(cancel.clone()));
//! tokio::spawn(router.run(cancel.clone()));
//!
//! let (tx, mut delivery) = tokio::sync::mpsc::channel(16);
//! tokio::spawn(h2.run(cancel.clone(), tx));
//!
//! h1.send("2", Bytes::from_static(b"hello"), 0).unwrap();
//! let pkt = delivery.recv().await.unwrap();
//! assert_eq!(pkt.payload(), &Bytes::from_static(b"hello"));
//! # cancel.cancel();
//! # }
//! ```

pub use lsnet_common::{
    attach, Interface, Link, PutError, Wire, DEFAULT_CAPACITY, DEFAULT_QUEUE_SIZE,
};
pub use lsnet_node::{
    DecapTable, EncapTable, FlowKey, FwdTable, Host, HostError, Router, RouterError, RouterStats,
    RouterTables,
};
pub use lsnet_wire::{
    frame::{FrameKind, LinkFrame},
    label::{Label, LabelFrame},
    packet::Packet,
};
