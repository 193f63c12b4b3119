use alloc::string::String;
use alloc::sync::Arc;

use gx_reflect::graph::ObjectGraph;
use gx_reflect::registry::{Persist, TypeRegistryArc};
use gx_reflect::resolver::TypeNameResolver;
use gx_reflect::value::Value;

use crate::{CodecConfig, DecodeError, Decoded, Decoder, EncodeError, Encoder};

/// A type registry, a type name resolver and a [`CodecConfig`], shared by
/// an [`Encoder`] and any number of [`Decoder`]s.
///
/// The registry starts with the builtin types and, with the `auto_register`
/// feature, every type that opted into automatic registration.
pub struct SerializationContext {
    registry: TypeRegistryArc,
    resolver: Arc<TypeNameResolver>,
    config: CodecConfig,
    encoder: Encoder,
}

impl Default for SerializationContext {
    fn default() -> Self {
        Self::with_config(CodecConfig::default())
    }
}

impl SerializationContext {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        let resolver = TypeNameResolver::new(config.resolver.clone());
        Self::with_resolver(config, resolver)
    }

    /// Uses `resolver` in place of one built from `config.resolver`.
    pub fn with_resolver(config: CodecConfig, resolver: TypeNameResolver) -> Self {
        let registry = TypeRegistryArc::default();
        if registry.write().auto_register() {
            log::trace!("auto registration enabled");
        }
        Self {
            encoder: Encoder::new(registry.clone(), config.clone()),
            registry,
            resolver: Arc::new(resolver),
            config,
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    #[inline]
    pub fn resolver(&self) -> &TypeNameResolver {
        &self.resolver
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Registers `T`. Returns `false` if its key was already taken.
    pub fn register<T: Persist>(&self) -> bool {
        self.registry.write().register::<T>()
    }

    #[inline]
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decoder(&self) -> Decoder {
        Decoder::new(self.registry.clone(), self.resolver.clone(), self.config.clone())
    }

    /// Shorthand for [`Encoder::serialize`].
    pub fn serialize(&self, graph: &ObjectGraph, root: &Value) -> Result<String, EncodeError> {
        self.encoder.serialize(graph, root)
    }

    /// Shorthand for [`Decoder::deserialize`].
    pub fn deserialize(&self, text: &str) -> Result<Decoded, DecodeError> {
        self.decoder().deserialize(text)
    }
}
