mod client;
mod credentials;
mod error;
mod helpers;
mod message;
mod projection;
mod request;
mod status;
mod transport;
mod types;
mod wire;

pub use client::Client;
pub use credentials::Credentials;
pub use error::{BoxError, Error, Result};
pub use helpers::{format_amount, format_size};
pub use message::{encode_value, TaggedMessage, TaggedValue};
pub use request::{ClientConfig, Operation, ORIGIN, UPLOAD_COOLDOWN, USER_AGENT};
pub use status::{check_status, StatusError, PURCHASE_REQUIRED};
pub use transport::{Method, Request, Response, Transport, UreqTransport};
pub use types::*;
pub use wire::WireError;
