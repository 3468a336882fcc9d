//! Typed handles on fields published through [`Introspect`].
//!
//! Adapters for types whose public surface hides state resolve a
//! [`FieldHandle`] once, by name and expected field type, and read the
//! field directly afterwards. A layout that does not match fails at
//! resolution, never while encoding.

use std::fmt;
use std::sync::OnceLock;

use graphpack_runtime::Introspect;

use crate::{GraphError, Result};

pub struct FieldHandle<T: 'static, F: 'static> {
    field: &'static graphpack_runtime::Field<T, F>,
}

impl<T: Introspect, F: 'static> FieldHandle<T, F> {
    /// Fails with [`GraphError::FieldNotFound`] when `T` has no such field
    /// and [`GraphError::FieldTypeMismatch`] when it is not an `F`.
    pub fn resolve(name: &'static str) -> Result<Self> {
        let owner = std::any::type_name::<T>();
        let descriptor = T::field(name).ok_or(GraphError::FieldNotFound { owner, field: name })?;
        let field = descriptor
            .typed::<T, F>()
            .ok_or(GraphError::FieldTypeMismatch {
                owner,
                field: name,
                expected: std::any::type_name::<F>(),
            })?;
        Ok(Self { field })
    }
}

impl<T: 'static, F: 'static> FieldHandle<T, F> {
    pub fn get<'a>(&self, target: &'a T) -> &'a F {
        self.field.get(target)
    }

    pub fn name(&self) -> &'static str {
        self.field.name()
    }
}

impl<T: 'static, F: 'static> Clone for FieldHandle<T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static, F: 'static> Copy for FieldHandle<T, F> {}

impl<T: 'static, F: 'static> fmt::Debug for FieldHandle<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldHandle").field(self.field).finish()
    }
}

/// A [`FieldHandle`] resolved on first use.
///
/// The outcome of the first resolution, success or failure, is kept and
/// returned on every later call.
pub struct LazyField<T: 'static, F: 'static> {
    name: &'static str,
    handle: OnceLock<Result<FieldHandle<T, F>>>,
}

impl<T: Introspect, F: 'static> LazyField<T, F> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: OnceLock::new(),
        }
    }

    pub fn handle(&self) -> Result<FieldHandle<T, F>> {
        self.handle
            .get_or_init(|| FieldHandle::resolve(self.name))
            .clone()
    }

    pub fn get<'a>(&self, target: &'a T) -> Result<&'a F> {
        Ok(self.handle()?.get(target))
    }

    pub fn is_resolved(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl<T: 'static, F: 'static> fmt::Debug for LazyField<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyField")
            .field("name", &self.name)
            .field("resolved", &self.handle.get().is_some())
            .finish()
    }
}
