use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Width of the destination id field on the wire.
pub const DST_WIDTH: usize = 5;
/// Width of the source id field on the wire.
pub const SRC_WIDTH: usize = 2;
/// Width of the priority field on the wire.
pub const PRIORITY_WIDTH: usize = 1;
/// Fill character used to left-pad numeric id fields.
pub const FILL: u8 = b'0';

/// Length of the fixed-width header preceding the payload.
pub const HEADER_LEN: usize = DST_WIDTH + SRC_WIDTH + PRIORITY_WIDTH;

#[derive(Debug, Error)]
pub enum Error {
    #[error("truncated packet: got {0} bytes, header needs {HEADER_LEN}")]
    Truncated(usize),
    #[error("id field is not valid UTF-8")]
    InvalidId,
    #[error("invalid priority character: {0:?}")]
    InvalidPriority(char),
}

/// An application-layer datagram addressed by destination and source
/// host ids, with a single-digit priority (0 = default).
///
/// Immutable once constructed: hosts build one when sending, routers
/// rebuild one when decapsulating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    dst: String,
    src: String,
    priority: u8,
    payload: Bytes,
}

impl Packet {
    /// Creates a new packet.
    ///
    /// # Panics
    /// Panics if `dst` or `src` exceed their wire field widths, or if
    /// `priority` is not a single decimal digit.
    pub fn new(
        dst: impl Into<String>,
        src: impl Into<String>,
        payload: Bytes,
        priority: u8,
    ) -> Self {
        let dst = dst.into();
        let src = src.into();
        assert!(dst.len() <= DST_WIDTH, "destination id too long, max {DST_WIDTH} characters");
        assert!(src.len() <= SRC_WIDTH, "source id too long, max {SRC_WIDTH} characters");
        assert!(priority <= 9, "priority must be a single decimal digit");

        Self { dst, src, priority, payload }
    }

    #[inline]
    pub fn dst(&self) -> &str {
        &self.dst
    }

    #[inline]
    pub fn src(&self) -> &str {
        &self.src
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.priority
    }

    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    #[inline]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Encodes the packet as `dst(5) + src(2) + priority(1) + payload`.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.payload.len());

        put_padded(&mut buf, &self.dst, DST_WIDTH);
        put_padded(&mut buf, &self.src, SRC_WIDTH);
        buf.put_u8(FILL + self.priority);
        buf.put(self.payload.clone());

        buf.freeze()
    }

    /// Decodes a packet from its wire form.
    ///
    /// Leading fill characters are stripped from the id fields, so an
    /// all-fill field decodes to the empty string (`"0"` encodes to
    /// `"00000"` and decodes to `""`).
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Truncated(bytes.len()));
        }

        let dst = strip_fill(&bytes[..DST_WIDTH])?;
        let src = strip_fill(&bytes[DST_WIDTH..DST_WIDTH + SRC_WIDTH])?;

        let priority = bytes[DST_WIDTH + SRC_WIDTH];
        if !priority.is_ascii_digit() {
            return Err(Error::InvalidPriority(priority as char));
        }

        let payload = Bytes::copy_from_slice(&bytes[HEADER_LEN..]);

        Ok(Self { dst, src, priority: priority - FILL, payload })
    }
}

/// Left-pads `value` with the fill character up to `width` and appends
/// it to the buffer.
pub(crate) fn put_padded(buf: &mut BytesMut, value: &str, width: usize) {
    for _ in value.len()..width {
        buf.put_u8(FILL);
    }
    buf.put(value.as_bytes());
}

/// Strips leading fill characters from a numeric id field.
pub(crate) fn strip_fill(field: &[u8]) -> Result<String, Error> {
    let field = std::str::from_utf8(field).map_err(|_| Error::InvalidId)?;
    Ok(field.trim_start_matches(FILL as char).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_layout() {
        let pkt = Packet::new("2", "1", Bytes::from_static(b"hello"), 0);
        assert_eq!(pkt.encode(), Bytes::from_static(b"00002010hello"));
    }

    #[test]
    fn roundtrip() {
        let pkt = Packet::new("42", "7", Bytes::from_static(b"payload"), 3);
        let decoded = Packet::decode(&pkt.encode()).unwrap();

        assert_eq!(decoded.dst(), "42");
        assert_eq!(decoded.src(), "7");
        assert_eq!(decoded.priority(), 3);
        assert_eq!(decoded.payload(), &Bytes::from_static(b"payload"));
    }

    #[test]
    fn all_fill_id_decodes_to_empty() {
        // Accepted quirk: an id of "0" pads to all-fill and the decoder
        // cannot tell it apart from an empty id.
        let pkt = Packet::new("0", "0", Bytes::new(), 0);
        let decoded = Packet::decode(&pkt.encode()).unwrap();

        assert_eq!(decoded.dst(), "");
        assert_eq!(decoded.src(), "");
    }

    #[test]
    fn empty_payload_roundtrip() {
        let pkt = Packet::new("3", "12", Bytes::new(), 9);
        let decoded = Packet::decode(&pkt.encode()).unwrap();

        assert_eq!(decoded, pkt);
        assert!(decoded.payload().is_empty());
    }

    #[test]
    fn truncated_input_errors() {
        assert!(matches!(Packet::decode(b"0000201"), Err(Error::Truncated(7))));
    }

    #[test]
    fn non_digit_priority_errors() {
        assert!(matches!(Packet::decode(b"0000201xrest"), Err(Error::InvalidPriority('x'))));
    }

    #[test]
    #[should_panic(expected = "destination id too long")]
    fn oversize_dst_panics() {
        Packet::new("123456", "1", Bytes::new(), 0);
    }

    #[test]
    #[should_panic(expected = "single decimal digit")]
    fn oversize_priority_panics() {
        Packet::new("2", "1", Bytes::new(), 10);
    }
}
