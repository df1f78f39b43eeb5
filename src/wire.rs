use bytes::Bytes;
use quick_protobuf::reader::BytesReader;
use quick_protobuf::writer::{Writer, WriterBackend};

/// Largest field tag the wire format can carry.
pub(crate) const MAX_TAG: u32 = (1 << 29) - 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    #[error("varint longer than 64 bits")]
    VarintOverflow,
    #[error("invalid field tag {0}")]
    InvalidTag(u64),
    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),
    #[error("invalid field key {0:?}")]
    InvalidKey(String),
    #[error("cannot encode {0} as a tagged field")]
    Unencodable(&'static str),
    #[error("protobuf: {0}")]
    Codec(String),
}

impl From<quick_protobuf::Error> for WireError {
    fn from(error: quick_protobuf::Error) -> Self {
        match error {
            quick_protobuf::Error::UnexpectedEndOfBuffer => Self::UnexpectedEof,
            quick_protobuf::Error::Varint => Self::VarintOverflow,
            quick_protobuf::Error::UnknownWireType(wire_type) => Self::UnsupportedWireType(wire_type),
            other => Self::Codec(other.to_string()),
        }
    }
}

/// Wire types understood by the codec. Groups (3, 4) are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WireType {
    Varint,
    Fixed64,
    Len,
    Fixed32,
}

impl WireType {
    fn from_key(key: u64) -> Result<Self, WireError> {
        match key & 0x7 {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::Len),
            5 => Ok(Self::Fixed32),
            other => Err(WireError::UnsupportedWireType(other as u8)),
        }
    }

    fn bits(self) -> u32 {
        match self {
            Self::Varint => 0,
            Self::Fixed64 => 1,
            Self::Len => 2,
            Self::Fixed32 => 5,
        }
    }
}

/// A single field exactly as read off the wire, before any interpretation of
/// length-delimited payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawField {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    Len(Bytes),
}

/// Cursor over one message body. Length-delimited payloads are handed out as
/// slices of the same buffer.
pub(crate) struct FieldReader {
    buf: Bytes,
    reader: BytesReader,
}

impl FieldReader {
    pub fn new(buf: Bytes) -> Self {
        let reader = BytesReader::from_bytes(&buf);
        Self { buf, reader }
    }

    /// Read the next `(tag, field)` pair, or `None` once the buffer is exhausted.
    pub fn next_field(&mut self) -> Result<Option<(u32, RawField)>, WireError> {
        if self.reader.is_eof() {
            return Ok(None);
        }
        // The key is read as a full varint so oversized tags are rejected
        // rather than truncated to 32 bits.
        let key = self.reader.read_varint64(&self.buf)?;
        let tag = key >> 3;
        if tag == 0 || tag > u64::from(MAX_TAG) {
            return Err(WireError::InvalidTag(tag));
        }
        let field = match WireType::from_key(key)? {
            WireType::Varint => RawField::Varint(self.reader.read_varint64(&self.buf)?),
            WireType::Fixed64 => RawField::Fixed64(self.reader.read_fixed64(&self.buf)?),
            WireType::Fixed32 => RawField::Fixed32(self.reader.read_fixed32(&self.buf)?),
            WireType::Len => {
                let payload = self.reader.read_bytes(&self.buf)?;
                RawField::Len(self.buf.slice_ref(payload))
            }
        };
        Ok(Some((tag as u32, field)))
    }
}

fn key(tag: u32, wire_type: WireType) -> u32 {
    (tag << 3) | wire_type.bits()
}

pub(crate) fn write_varint<W: WriterBackend>(
    writer: &mut Writer<W>,
    tag: u32,
    value: u64,
) -> Result<(), WireError> {
    writer.write_tag(key(tag, WireType::Varint))?;
    writer.write_varint(value)?;
    Ok(())
}

pub(crate) fn write_fixed64<W: WriterBackend>(
    writer: &mut Writer<W>,
    tag: u32,
    value: u64,
) -> Result<(), WireError> {
    writer.write_tag(key(tag, WireType::Fixed64))?;
    writer.write_fixed64(value)?;
    Ok(())
}

pub(crate) fn write_len<W: WriterBackend>(
    writer: &mut Writer<W>,
    tag: u32,
    payload: &[u8],
) -> Result<(), WireError> {
    writer.write_tag(key(tag, WireType::Len))?;
    writer.write_bytes(payload)?;
    Ok(())
}
