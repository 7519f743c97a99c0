use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

const NETWORK_TAG: &[u8] = b"Network";
const MPLS_TAG: &[u8] = b"MPLS";

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown frame type: {0:?}")]
    UnknownType(String),
}

/// The payload type carried by a link frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The payload is an encoded [`Packet`](crate::packet::Packet).
    Network,
    /// The payload is an encoded [`LabelFrame`](crate::label::LabelFrame).
    Mpls,
}

impl FrameKind {
    fn tag(&self) -> &'static [u8] {
        match self {
            Self::Network => NETWORK_TAG,
            Self::Mpls => MPLS_TAG,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Mpls => "MPLS",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed link-layer envelope: a frame kind tag followed by the
/// opaque encoded bytes of a packet or label frame.
///
/// Dispatch on the kind is exhaustive matching; the only runtime
/// validation is the unknown-tag check in [`LinkFrame::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFrame {
    kind: FrameKind,
    payload: Bytes,
}

impl LinkFrame {
    pub fn new(kind: FrameKind, payload: Bytes) -> Self {
        Self { kind, payload }
    }

    /// Wraps encoded packet bytes in a `Network` envelope.
    #[inline]
    pub fn network(payload: Bytes) -> Self {
        Self::new(FrameKind::Network, payload)
    }

    /// Wraps encoded label-frame bytes in an `MPLS` envelope.
    #[inline]
    pub fn mpls(payload: Bytes) -> Self {
        Self::new(FrameKind::Mpls, payload)
    }

    #[inline]
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    #[inline]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Encodes the envelope as the ASCII tag followed by the payload.
    pub fn encode(&self) -> Bytes {
        let tag = self.kind.tag();
        let mut buf = BytesMut::with_capacity(tag.len() + self.payload.len());

        buf.put(tag);
        buf.put(self.payload.clone());

        buf.freeze()
    }

    /// Decodes an envelope, validating the type tag.
    ///
    /// An unrecognized tag is a protocol violation, not a transient
    /// condition: the caller is expected to surface it, not drop it.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if let Some(payload) = bytes.strip_prefix(NETWORK_TAG) {
            Ok(Self::network(Bytes::copy_from_slice(payload)))
        } else if let Some(payload) = bytes.strip_prefix(MPLS_TAG) {
            Ok(Self::mpls(Bytes::copy_from_slice(payload)))
        } else {
            let head = &bytes[..bytes.len().min(NETWORK_TAG.len())];
            Err(Error::UnknownType(String::from_utf8_lossy(head).into_owned()))
        }
    }
}
