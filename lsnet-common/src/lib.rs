//! Common infrastructure for the lsnet simulator: the bounded duplex
//! [`Interface`] queue pair that models a link attachment, and the
//! [`Link`] shuttle that moves frames between two attachments.

mod interface;
mod link;

pub use interface::{attach, Interface, PutError, Wire, DEFAULT_CAPACITY, DEFAULT_QUEUE_SIZE};
pub use link::Link;
