//! Codec table.
//!
//! A [`Registry`] records which codec handles each domain type that has more
//! than one wire form. It is built once, never mutated, and passed by
//! reference into every encode or decode call. [`default_registry`] is the
//! process-wide instance used by the free functions in [`crate::codec::text`].

use lazy_static::lazy_static;

use crate::codec::primitives::TypeTagStyle;
use crate::codec::scalar::TimestampFormat;
use crate::limits::MAX_TEXT_LEN;

/// Domain types with a configurable codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    Timestamp,
    Identifier,
}

/// How identifiers in polymorphic positions (property values, lists) are written.
///
/// Element `id`, `outV` and `inV` fields always use the plain form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdFormat {
    /// Bare scalar.
    #[default]
    Plain,
    /// Scalar wrapped in a type tag.
    Tagged(TypeTagStyle),
}

/// A codec registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    Timestamp(TimestampFormat),
    Identifier(IdFormat),
}

impl Codec {
    /// The domain type this codec is registered for.
    pub fn kind(&self) -> CodecKind {
        match self {
            Codec::Timestamp(_) => CodecKind::Timestamp,
            Codec::Identifier(_) => CodecKind::Identifier,
        }
    }
}

/// What shape-driven decoding does with doubles that cannot be exact 64-bit integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrecisionPolicy {
    /// Narrow anyway and log a warning.
    #[default]
    Warn,
    /// Fail with a format error.
    Reject,
}

/// Immutable codec table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    timestamps: TimestampFormat,
    identifiers: IdFormat,
    precision: PrecisionPolicy,
    max_text_len: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            timestamps: TimestampFormat::EpochMillis,
            identifiers: IdFormat::Plain,
            precision: PrecisionPolicy::Warn,
            max_text_len: MAX_TEXT_LEN,
        }
    }
}

impl Registry {
    /// Starts a builder from the default table.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Returns the codec registered for `kind`.
    pub fn codec(&self, kind: CodecKind) -> Codec {
        match kind {
            CodecKind::Timestamp => Codec::Timestamp(self.timestamps),
            CodecKind::Identifier => Codec::Identifier(self.identifiers),
        }
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamps
    }

    pub fn id_format(&self) -> IdFormat {
        self.identifiers
    }

    pub fn precision(&self) -> PrecisionPolicy {
        self.precision
    }

    /// Longest JSON text accepted by the decoder.
    pub fn max_text_len(&self) -> usize {
        self.max_text_len
    }
}

/// Builder for a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Registers a codec; a later registration for the same kind replaces it.
    pub fn register(mut self, codec: Codec) -> Self {
        match codec {
            Codec::Timestamp(format) => self.registry.timestamps = format,
            Codec::Identifier(format) => self.registry.identifiers = format,
        }
        self
    }

    /// Registers the timestamp codec.
    pub fn timestamps(self, format: TimestampFormat) -> Self {
        self.register(Codec::Timestamp(format))
    }

    /// Tags identifiers written in polymorphic positions.
    pub fn tag_ids(self, style: TypeTagStyle) -> Self {
        self.register(Codec::Identifier(IdFormat::Tagged(style)))
    }

    pub fn precision(mut self, policy: PrecisionPolicy) -> Self {
        self.registry.precision = policy;
        self
    }

    pub fn max_text_len(mut self, len: usize) -> Self {
        self.registry.max_text_len = len;
        self
    }

    pub fn build(self) -> Registry {
        self.registry
    }
}

lazy_static! {
    static ref DEFAULT_REGISTRY: Registry = Registry::default();
}

/// Returns the process-wide default registry, built on first use.
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = Registry::default();
        assert_eq!(registry.codec(CodecKind::Timestamp), Codec::Timestamp(TimestampFormat::EpochMillis));
        assert_eq!(registry.codec(CodecKind::Identifier), Codec::Identifier(IdFormat::Plain));
        assert_eq!(registry.precision(), PrecisionPolicy::Warn);
        assert_eq!(registry.max_text_len(), MAX_TEXT_LEN);
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = Registry::builder()
            .timestamps(TimestampFormat::Rfc3339)
            .tag_ids(TypeTagStyle::WrapperArray)
            .register(Codec::Identifier(IdFormat::Tagged(TypeTagStyle::WrapperObject)))
            .timestamps(TimestampFormat::EpochMillis)
            .build();

        assert_eq!(registry.timestamp_format(), TimestampFormat::EpochMillis);
        assert_eq!(registry.id_format(), IdFormat::Tagged(TypeTagStyle::WrapperObject));
    }

    #[test]
    fn test_registering_one_kind_leaves_others() {
        let registry = Registry::builder()
            .tag_ids(TypeTagStyle::WrapperArray)
            .precision(PrecisionPolicy::Reject)
            .max_text_len(16)
            .build();

        assert_eq!(registry.timestamp_format(), TimestampFormat::EpochMillis);
        assert_eq!(registry.precision(), PrecisionPolicy::Reject);
        assert_eq!(registry.max_text_len(), 16);
    }

    #[test]
    fn test_default_registry_is_shared() {
        let a = default_registry() as *const Registry;
        let b = default_registry() as *const Registry;
        assert_eq!(a, b);
        assert_eq!(*default_registry(), Registry::default());
    }

    #[test]
    fn test_codec_kind() {
        assert_eq!(Codec::Timestamp(TimestampFormat::Rfc3339).kind(), CodecKind::Timestamp);
        assert_eq!(Codec::Identifier(IdFormat::Plain).kind(), CodecKind::Identifier);
    }

    #[test]
    fn test_registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
