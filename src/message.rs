use std::collections::BTreeMap;

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use quick_protobuf::writer::{Writer, WriterBackend};
use serde_json::Value;

use crate::wire::{self, FieldReader, RawField, WireError, MAX_TAG};

/// Nesting limit for speculative decoding of length-delimited payloads.
/// Deeper payloads stay text or bytes.
const MAX_DEPTH: usize = 32;

/// A decoded tagged-field message: field tag → every value seen for that tag,
/// in wire order.
///
/// The wire carries no schema, so a length-delimited payload is resolved when
/// it is read: printable UTF-8 is text, anything else that parses completely
/// is a nested message, and whatever is left is text or raw bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaggedMessage {
    fields: BTreeMap<u32, Vec<TaggedValue>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaggedValue {
    Varint(u64),
    Fixed64(u64),
    Fixed32(u32),
    String(String),
    Bytes(Bytes),
    Message(TaggedMessage),
}

impl TaggedMessage {
    pub fn decode(buf: &[u8]) -> Result<Self, WireError> {
        Self::decode_at(Bytes::copy_from_slice(buf), 0)
    }

    fn decode_at(buf: Bytes, depth: usize) -> Result<Self, WireError> {
        let mut message = Self::default();
        let mut fields = FieldReader::new(buf);
        while let Some((tag, field)) = fields.next_field()? {
            let value = match field {
                RawField::Varint(v) => TaggedValue::Varint(v),
                RawField::Fixed64(v) => TaggedValue::Fixed64(v),
                RawField::Fixed32(v) => TaggedValue::Fixed32(v),
                RawField::Len(payload) => TaggedValue::from_payload(payload, depth + 1),
            };
            message.fields.entry(tag).or_default().push(value);
        }
        Ok(message)
    }

    /// Last value for `tag`; a repeated scalar behaves like a single one.
    pub fn get(&self, tag: u32) -> Option<&TaggedValue> {
        self.fields.get(&tag).and_then(|values| values.last())
    }

    pub fn get_all(&self, tag: u32) -> &[TaggedValue] {
        self.fields.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[TaggedValue])> {
        self.fields.iter().map(|(tag, values)| (*tag, values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keyed form: an object whose keys are the decimal tags. A tag seen once
    /// maps to its value, a repeated tag maps to an array.
    pub fn to_value(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(tag, values)| {
                let value = match values.as_slice() {
                    [single] => single.to_value(),
                    many => Value::Array(many.iter().map(TaggedValue::to_value).collect()),
                };
                (tag.to_string(), value)
            })
            .collect();
        Value::Object(map)
    }

    /// The keyed form serialized as JSON bytes.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.to_value())
    }
}

impl TaggedValue {
    fn from_payload(payload: Bytes, depth: usize) -> Self {
        let printable = std::str::from_utf8(&payload)
            .map(|text| !text.chars().any(char::is_control))
            .unwrap_or(false);
        if !printable && depth < MAX_DEPTH {
            if let Ok(message) = TaggedMessage::decode_at(payload.clone(), depth) {
                return Self::Message(message);
            }
        }
        match String::from_utf8(payload.to_vec()) {
            Ok(text) => Self::String(text),
            Err(_) => Self::Bytes(payload),
        }
    }

    pub fn as_message(&self) -> Option<&TaggedMessage> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Varints are reinterpreted as signed so negative `int32`/`int64`
    /// values keep their sign.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Varint(v) => Value::from(*v as i64),
            Self::Fixed64(v) => Value::from(*v),
            Self::Fixed32(v) => Value::from(*v),
            Self::String(s) => Value::String(s.clone()),
            Self::Bytes(b) => Value::String(general_purpose::STANDARD.encode(b)),
            Self::Message(m) => m.to_value(),
        }
    }
}

/// Encode a keyed value (object keyed by decimal tags) into wire bytes.
///
/// Arrays become repeated fields, `null` fields are skipped, booleans and
/// integers are varints, other numbers are 64-bit floats.
pub fn encode_value(value: &Value) -> Result<Bytes, WireError> {
    let mut buf = Vec::new();
    encode_object(&mut Writer::new(&mut buf), value)?;
    Ok(Bytes::from(buf))
}

fn encode_object<W: WriterBackend>(writer: &mut Writer<W>, value: &Value) -> Result<(), WireError> {
    let Value::Object(map) = value else {
        return Err(WireError::Unencodable("a non-object message"));
    };
    let mut fields = map
        .iter()
        .map(|(key, value)| match key.parse::<u32>() {
            Ok(tag) if (1..=MAX_TAG).contains(&tag) => Ok((tag, value)),
            _ => Err(WireError::InvalidKey(key.clone())),
        })
        .collect::<Result<Vec<_>, _>>()?;
    fields.sort_by_key(|(tag, _)| *tag);
    for (tag, value) in fields {
        encode_field(writer, tag, value, true)?;
    }
    Ok(())
}

fn encode_field<W: WriterBackend>(
    writer: &mut Writer<W>,
    tag: u32,
    value: &Value,
    top: bool,
) -> Result<(), WireError> {
    match value {
        Value::Null => Ok(()),
        Value::Bool(b) => wire::write_varint(writer, tag, u64::from(*b)),
        Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(u), _, _) => wire::write_varint(writer, tag, u),
            (None, Some(i), _) => wire::write_varint(writer, tag, i as u64),
            (None, None, Some(f)) => wire::write_fixed64(writer, tag, f.to_bits()),
            (None, None, None) => Err(WireError::Unencodable("a number")),
        },
        Value::String(s) => wire::write_len(writer, tag, s.as_bytes()),
        Value::Array(items) if top => items
            .iter()
            .try_for_each(|item| encode_field(writer, tag, item, false)),
        Value::Array(_) => Err(WireError::Unencodable("a nested array")),
        Value::Object(_) => {
            let mut nested = Vec::new();
            encode_object(&mut Writer::new(&mut nested), value)?;
            wire::write_len(writer, tag, &nested)
        }
    }
}
