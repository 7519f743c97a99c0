use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::packet::{self, Packet, DST_WIDTH, SRC_WIDTH};

/// Width of the label field on the wire (by convention; the label is
/// numeric and the encoder always pads to this width).
pub const LABEL_WIDTH: usize = 2;

/// An MPLS label.
pub type Label = u32;

#[derive(Debug, Error)]
pub enum Error {
    #[error("truncated label frame: got {0} bytes")]
    Truncated(usize),
    #[error("invalid label field: {0:?}")]
    InvalidLabel(String),
    #[error(transparent)]
    Packet(#[from] packet::Error),
}

/// A label-switched encapsulation of a [`Packet`].
///
/// Created by a router when encapsulating an ingress packet or
/// re-labeling a frame in transit; consumed when forwarded or
/// decapsulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFrame {
    label: Label,
    packet: Packet,
}

impl LabelFrame {
    /// Wraps a packet under the given label.
    ///
    /// # Panics
    /// Panics if the label does not fit the 2-character wire field.
    pub fn new(packet: Packet, label: Label) -> Self {
        assert!(label < 100, "label too large for a {LABEL_WIDTH}-character field");

        Self { label, packet }
    }

    #[inline]
    pub fn label(&self) -> Label {
        self.label
    }

    #[inline]
    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    /// Recovers the wrapped packet, for decapsulation on egress.
    #[inline]
    pub fn into_packet(self) -> Packet {
        self.packet
    }

    /// Encodes the frame as `label(2) + dst(5) + src(2) + payload`.
    ///
    /// The layout carries no priority field: label-switched frames do
    /// not preserve packet priority on the wire.
    pub fn encode(&self) -> Bytes {
        let payload = self.packet.payload();
        let mut buf =
            BytesMut::with_capacity(LABEL_WIDTH + DST_WIDTH + SRC_WIDTH + payload.len());

        packet::put_padded(&mut buf, &self.label.to_string(), LABEL_WIDTH);
        packet::put_padded(&mut buf, self.packet.dst(), DST_WIDTH);
        packet::put_padded(&mut buf, self.packet.src(), SRC_WIDTH);
        buf.put(payload.clone());

        buf.freeze()
    }

    /// Decodes a label frame from its wire form.
    ///
    /// If `label` is given (a router re-labeling a frame in transit)
    /// it overrides whatever the leading field says; otherwise the
    /// label parses from the first [`LABEL_WIDTH`] characters. The
    /// wrapped packet decodes with the default priority, since the
    /// layout carries none.
    pub fn decode(bytes: &[u8], label: Option<Label>) -> Result<Self, Error> {
        const MIN_LEN: usize = LABEL_WIDTH + DST_WIDTH + SRC_WIDTH;

        if bytes.len() < MIN_LEN {
            return Err(Error::Truncated(bytes.len()));
        }

        let label = match label {
            Some(label) => label,
            None => parse_label(&bytes[..LABEL_WIDTH])?,
        };

        let rest = &bytes[LABEL_WIDTH..];
        let dst = packet::strip_fill(&rest[..DST_WIDTH])?;
        let src = packet::strip_fill(&rest[DST_WIDTH..DST_WIDTH + SRC_WIDTH])?;
        let payload = Bytes::copy_from_slice(&rest[DST_WIDTH + SRC_WIDTH..]);

        Ok(Self { label, packet: Packet::new(dst, src, payload, 0) })
    }
}

/// Parses a label field, stripping the fill padding. An all-fill field
/// is label 0.
pub fn parse_label(field: &[u8]) -> Result<Label, Error> {
    let digits = packet::strip_fill(field)?;

    if digits.is_empty() {
        return Ok(0);
    }

    digits.parse().map_err(|_| Error::InvalidLabel(digits.clone()))
}
