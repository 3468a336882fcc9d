//! Introspection tables for state that has no public accessor.
//!
//! A type opts in by implementing [`Introspect`], listing a
//! [`FieldDescriptor`] per private field. Each descriptor erases a typed
//! [`Field`] accessor; callers recover it by downcasting to the exact
//! `Field<T, F>` they expect, so a wrong field type is detected rather than
//! misread.

use std::any::Any;
use std::fmt;

use crate::Object;

/// Typed accessor for one field of `T`.
pub struct Field<T, F> {
    name: &'static str,
    get: fn(&T) -> &F,
}

impl<T, F> Field<T, F> {
    pub const fn new(name: &'static str, get: fn(&T) -> &F) -> Self {
        Self { name, get }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'a>(&self, target: &'a T) -> &'a F {
        (self.get)(target)
    }
}

impl<T, F> fmt::Debug for Field<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<F>())
            .finish()
    }
}

/// Type-erased [`Field`].
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    field: &'static (dyn Any + Send + Sync),
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, field: &'static (dyn Any + Send + Sync)) -> Self {
        Self { name, field }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Recovers the typed accessor, or `None` if the field is not an `F`.
    pub fn typed<T: 'static, F: 'static>(&self) -> Option<&'static Field<T, F>> {
        self.field.downcast_ref::<Field<T, F>>()
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldDescriptor").field(&self.name).finish()
    }
}

/// A named static belonging to a type.
#[derive(Clone, Copy)]
pub struct StaticField {
    name: &'static str,
    value: &'static (dyn Any + Send + Sync),
}

impl StaticField {
    pub const fn new(name: &'static str, value: &'static (dyn Any + Send + Sync)) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value<T: 'static>(&self) -> Option<&'static T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for StaticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticField").field(&self.name).finish()
    }
}

pub trait Introspect: Object + Sized {
    fn fields() -> &'static [FieldDescriptor];

    fn static_fields() -> &'static [StaticField] {
        &[]
    }

    fn field(name: &str) -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.name() == name)
    }
}
