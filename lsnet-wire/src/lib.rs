//! Wire formats for the lsnet simulator.
//!
//! All formats are textual with fixed-width prefix fields: numeric ids
//! are left-padded with `'0'` and the payload is the untouched
//! remainder of the frame. See [`packet`] for the network datagram
//! layout, [`label`] for the label-switched frame layout, and
//! [`frame`] for the typed link-layer envelope that carries either of
//! them across an interface.

pub mod frame;
pub mod label;
pub mod packet;
