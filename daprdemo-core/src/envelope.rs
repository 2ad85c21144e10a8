//! # Envelopes
//!
//! Dapr never sees domain types. Every message travels inside an envelope carrying routing
//! information (a target app id and method, or a topic) plus a [`Payload`]: the encoded
//! message tagged with its type URL.
//!
//! The receiving side may not have every payload type registered, so a payload is only ever
//! read back through [`Payload::parse_as`], which decodes the bytes as the type the caller
//! names and ignores the type URL. Nothing unpacks a payload by looking up its type URL.
//!
//! ```rust
//! use daprdemo_core::dapr_proto::pb::daprexamples::SayRequest;
//! use daprdemo_core::envelope::InvokeEnvelope;
//!
//! let request = SayRequest { message: "hello".to_string() };
//! let envelope = InvokeEnvelope::new("OrderService", "say", &request).unwrap();
//!
//! assert_eq!(envelope.data.parse_as::<SayRequest>().unwrap(), request);
//! ```
use dapr_proto::pb::dapr::{
    InvokeServiceEnvelope, InvokeServiceResponseEnvelope, PublishEventEnvelope,
};
use prost::{DecodeError, Message, Name};
use prost_types::Any;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Envelope field '{0}' must not be empty")]
    Empty(&'static str),
}

/// A type-erased payload: raw protobuf bytes tagged with a type URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Any);

impl Payload {
    /// Encodes `message` and tags it with its type URL.
    pub fn pack<M: Name>(message: &M) -> Self {
        Self(Any {
            type_url: M::type_url(),
            value: message.encode_to_vec(),
        })
    }

    /// Decodes the payload bytes as `M`.
    ///
    /// The type URL is not checked; the caller decides what the bytes are.
    pub fn parse_as<M: Message + Default>(&self) -> Result<M, DecodeError> {
        M::decode(self.0.value.as_slice())
    }

    pub fn type_url(&self) -> &str {
        &self.0.type_url
    }

    pub fn value(&self) -> &[u8] {
        &self.0.value
    }

    /// `true` for a payload with neither a type URL nor bytes (e.g. a missing `data` field).
    pub fn is_empty(&self) -> bool {
        self.0.type_url.is_empty() && self.0.value.is_empty()
    }
}

impl From<Any> for Payload {
    fn from(any: Any) -> Self {
        Self(any)
    }
}

impl From<Payload> for Any {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

/// A service invocation routed by the sidecar to `method` on the app identified by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeEnvelope {
    pub id: String,
    pub method: String,
    pub data: Payload,
    pub metadata: HashMap<String, String>,
}

impl InvokeEnvelope {
    pub fn new<M: Name>(
        id: impl Into<String>,
        method: impl Into<String>,
        message: &M,
    ) -> Result<Self, EnvelopeError> {
        Ok(Self {
            id: non_empty("id", id.into())?,
            method: non_empty("method", method.into())?,
            data: Payload::pack(message),
            metadata: HashMap::new(),
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl From<InvokeEnvelope> for InvokeServiceEnvelope {
    fn from(envelope: InvokeEnvelope) -> Self {
        InvokeServiceEnvelope {
            id: envelope.id,
            method: envelope.method,
            data: Some(envelope.data.into()),
            metadata: envelope.metadata,
        }
    }
}

/// An event published by the sidecar on `topic`.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishEnvelope {
    pub topic: String,
    pub data: Payload,
}

impl PublishEnvelope {
    pub fn new<M: Name>(topic: impl Into<String>, message: &M) -> Result<Self, EnvelopeError> {
        Ok(Self {
            topic: non_empty("topic", topic.into())?,
            data: Payload::pack(message),
        })
    }
}

impl From<PublishEnvelope> for PublishEventEnvelope {
    fn from(envelope: PublishEnvelope) -> Self {
        PublishEventEnvelope {
            topic: envelope.topic,
            data: Some(envelope.data.into()),
        }
    }
}

/// The answer to an [`InvokeEnvelope`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeResponse {
    pub data: Payload,
    pub metadata: HashMap<String, String>,
}

impl InvokeResponse {
    /// Shorthand for `self.data.parse_as::<M>()`.
    pub fn parse_as<M: Message + Default>(&self) -> Result<M, DecodeError> {
        self.data.parse_as()
    }
}

impl From<InvokeServiceResponseEnvelope> for InvokeResponse {
    fn from(response: InvokeServiceResponseEnvelope) -> Self {
        Self {
            data: response.data.map(Payload::from).unwrap_or_default(),
            metadata: response.metadata,
        }
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, EnvelopeError> {
    if value.trim().is_empty() {
        return Err(EnvelopeError::Empty(field));
    }
    Ok(value)
}
