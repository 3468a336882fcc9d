//! The host engine driving adapters.

mod context;
mod registry;

pub use context::{CopyContext, Placeholder, ReadContext, WriteContext};
pub use registry::{Registration, Registry, TypeKey};

use graphpack_runtime::Value;
use tracing::debug;

use crate::{adapters, EngineConfig, Result};

/// A frozen [`Registry`] plus configuration.
///
/// Engines hold no per-call state; every call builds its own context, so
/// one engine can serve any number of calls.
#[derive(Debug)]
pub struct Engine {
    registry: Registry,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: Registry, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        debug!(types = registry.len(), ?config, "engine ready");
        Ok(Self { registry, config })
    }

    /// An engine with every built-in adapter and the default configuration.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Registry::new();
        adapters::register_defaults(&mut registry)?;
        Self::new(registry, EngineConfig::default())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut ctx = WriteContext::new(self);
        ctx.write_value(value)?;
        Ok(ctx.finish())
    }

    /// Decodes one value; the input must be consumed exactly.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let mut ctx = ReadContext::new(self, bytes);
        let value = ctx.read_value().map_err(|err| ctx.rejected(err))?;
        ctx.finish()?;
        Ok(value)
    }

    /// Encodes `value` as a `ty` without a class id.
    pub fn encode_typed(&self, value: &Value, ty: &TypeKey) -> Result<Vec<u8>> {
        let mut ctx = WriteContext::new(self);
        ctx.write_object(value, ty)?;
        Ok(ctx.finish())
    }

    pub fn decode_typed(&self, bytes: &[u8], ty: &TypeKey) -> Result<Value> {
        let mut ctx = ReadContext::new(self, bytes);
        let value = ctx.read_object(ty).map_err(|err| ctx.rejected(err))?;
        ctx.finish()?;
        Ok(value)
    }

    /// Deep-copies `value` through the registered adapters.
    pub fn copy(&self, value: &Value) -> Result<Value> {
        CopyContext::new(self).copy(value)
    }
}
