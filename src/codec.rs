// codec.rs - Polymorphic Payload Codec
//
//! Type-tagged payload codec.
//!
//! Envelope payloads travel as `google.protobuf.Any`: a canonical type name
//! plus opaque bytes. Encoding attaches the tag from the message's own
//! schema name. Decoding has no static type to work with, so it consults a
//! process-global table of factories keyed by fully-qualified type name —
//! a tagged-union decode table built at process init, not reflection.
//!
//! Every message type that can appear inside an envelope must be announced
//! once at startup with [`register_type`]; decoding an unregistered type
//! fails closed with [`CodecError::UnknownType`] and only poisons that one
//! invocation, never the process.

use std::any::Any as StdAny;
use std::sync::LazyLock;

use dashmap::DashMap;
use prost_types::Any;
use thiserror::Error;

/// Type-URL prefix attached to encoded payloads, matching the proxy's
/// `anypb` convention.
const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Codec errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("failed to decode {type_name}: {source}")]
    Decode {
        type_name: String,
        source: prost::DecodeError,
    },
}

/// An erased protobuf message: any registered type, boxed behind one trait
/// so envelopes can carry payloads whose concrete type is decided at
/// runtime. Blanket-implemented for every `prost::Message` with a schema
/// name.
pub trait AnyMessage: Send + Sync + 'static {
    /// Access as `std::any::Any` for downcasting to the concrete type.
    fn as_any(&self) -> &dyn StdAny;

    /// Fully-qualified schema name, e.g. `example.CounterState`.
    fn full_name(&self) -> String;

    /// Serialized protobuf bytes of this message.
    fn encode_bytes(&self) -> Vec<u8>;
}

impl<M> AnyMessage for M
where
    M: prost::Message + prost::Name + Default + 'static,
{
    fn as_any(&self) -> &dyn StdAny {
        self
    }

    fn full_name(&self) -> String {
        M::full_name()
    }

    fn encode_bytes(&self) -> Vec<u8> {
        self.encode_to_vec()
    }
}

impl dyn AnyMessage {
    /// Downcast to a concrete message type, the receiving end of the
    /// type-tagged envelope.
    pub fn downcast_ref<M: AnyMessage>(&self) -> Option<&M> {
        self.as_any().downcast_ref::<M>()
    }

    /// Whether the erased message is of concrete type `M`.
    pub fn is<M: AnyMessage>(&self) -> bool {
        self.as_any().is::<M>()
    }
}

impl std::fmt::Debug for dyn AnyMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnyMessage({})", self.full_name())
    }
}

type DecodeFn = fn(&[u8]) -> Result<Box<dyn AnyMessage>, CodecError>;

/// Registry of payload decoders, keyed by fully-qualified type name.
#[derive(Default)]
pub struct TypeRegistry {
    factories: DashMap<String, DecodeFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
        }
    }

    /// Register a message type. Idempotent; later registrations of the
    /// same name replace the earlier factory.
    pub fn register<M>(&self)
    where
        M: prost::Message + prost::Name + Default + 'static,
    {
        self.factories.insert(M::full_name(), decode_into::<M>);
    }

    /// Decode a tagged payload into the registered concrete type.
    pub fn decode(&self, payload: &Any) -> Result<Box<dyn AnyMessage>, CodecError> {
        let type_name = type_name_of(&payload.type_url);
        let factory = *self
            .factories
            .get(type_name)
            .ok_or_else(|| CodecError::UnknownType(type_name.to_string()))?;
        factory(&payload.value)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

fn decode_into<M>(bytes: &[u8]) -> Result<Box<dyn AnyMessage>, CodecError>
where
    M: prost::Message + prost::Name + Default + 'static,
{
    M::decode(bytes)
        .map(|message| Box::new(message) as Box<dyn AnyMessage>)
        .map_err(|source| CodecError::Decode {
            type_name: M::full_name(),
            source,
        })
}

/// The type name is whatever follows the last `/` of the type URL.
fn type_name_of(type_url: &str) -> &str {
    type_url
        .rsplit_once('/')
        .map(|(_, name)| name)
        .unwrap_or(type_url)
}

/// Process-global type table. Written during init, read on every dispatch.
static TYPES: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::new);

/// Announce a message type to the global registry. Call once per payload
/// type before the system starts serving invocations.
pub fn register_type<M>()
where
    M: prost::Message + prost::Name + Default + 'static,
{
    TYPES.register::<M>();
}

/// Encode a message into a type-tagged payload.
pub fn to_any(message: &dyn AnyMessage) -> Any {
    Any {
        type_url: format!("{TYPE_URL_PREFIX}{}", message.full_name()),
        value: message.encode_bytes(),
    }
}

/// Decode a type-tagged payload via the global registry.
pub fn decode_any(payload: &Any) -> Result<Box<dyn AnyMessage>, CodecError> {
    TYPES.decode(payload)
}

/// Decode an optional payload. Absence is the valid "no payload" path and
/// yields `Ok(None)`, not an error.
pub fn decode_optional(payload: Option<&Any>) -> Result<Option<Box<dyn AnyMessage>>, CodecError> {
    match payload {
        Some(any) => decode_any(any).map(Some),
        None => Ok(None),
    }
}
