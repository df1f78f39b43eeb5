use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

use crate::error::Result;
use crate::message::TaggedMessage;
use crate::types::{Delivery, Details};

/// Top-level envelope shared by every read response.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ResponseWrapper {
    #[serde(rename = "1", deserialize_with = "nested")]
    pub payload: Payload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Payload {
    #[serde(rename = "2", deserialize_with = "nested")]
    pub details_response: Details,
    #[serde(rename = "21", deserialize_with = "nested")]
    pub delivery_response: Delivery,
}

/// Bind a decoded message onto a typed shape through its keyed JSON form.
pub(crate) fn project<T: DeserializeOwned>(message: &TaggedMessage) -> Result<T> {
    let json = message.to_json()?;
    Ok(serde_json::from_slice(&json)?)
}

/// A field the wire sends bare when it occurs once and as a list otherwise.
/// Each element is a message and goes through [`nested`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = <Box<RawValue>>::deserialize(deserializer)?;
        let text = raw.get();
        if text.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Nested<T>>>(text)
                .map(|items| Self::Many(items.into_iter().map(|Nested(item)| item).collect()))
                .map_err(de::Error::custom)
        } else {
            serde_json::from_str::<Nested<T>>(text)
                .map(|Nested(item)| Self::One(item))
                .map_err(de::Error::custom)
        }
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

/// `deserialize_with` adapter normalizing a [`OneOrMany`] field to a `Vec`.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    OneOrMany::<T>::deserialize(deserializer).map(Vec::from)
}

/// Message element of a sequence, deserialized through [`nested`].
struct Nested<T>(T);

impl<'de, T: DeserializeOwned + Default> Deserialize<'de> for Nested<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        nested(deserializer).map(Nested)
    }
}

/// Nested message field. The decoder renders printable payloads as text, so a
/// message whose bytes all happen to be printable arrives as a string: decode
/// that string again as a message. The empty string is an empty message.
pub(crate) fn nested<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = <Box<RawValue>>::deserialize(deserializer)?;
    let text = raw.get();
    if !text.trim_start().starts_with('"') {
        return serde_json::from_str(text).map_err(de::Error::custom);
    }
    let payload: String = serde_json::from_str(text).map_err(de::Error::custom)?;
    if payload.is_empty() {
        return Ok(T::default());
    }
    let message = TaggedMessage::decode(payload.as_bytes()).map_err(de::Error::custom)?;
    project(&message).map_err(de::Error::custom)
}

/// 32-bit float carried as fixed32 bits.
pub(crate) fn float_bits<'de, D>(deserializer: D) -> std::result::Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    u32::deserialize(deserializer).map(f32::from_bits)
}
