//! Type registry: which adapter handles which concrete type.
//!
//! A [`Registry`] is filled during setup and then frozen into an
//! [`Engine`](crate::Engine). Class ids are assigned in registration order,
//! so two engines agree on the wire only when built from the same
//! registration sequence.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use graphpack_runtime::{EnumConstant, EnumType, Interface, Object};
use tracing::debug;

use crate::adapter::Adapter;
use crate::adapters::tokens::EnumNameAdapter;
use crate::{GraphError, Result};

/// A concrete runtime type, identified by its [`TypeId`].
///
/// The name is carried for diagnostics and name resolution; equality and
/// hashing use the id only.
#[derive(Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn new(type_id: TypeId, name: &'static str) -> Self {
        Self { type_id, name }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl From<EnumType> for TypeKey {
    fn from(ty: EnumType) -> Self {
        TypeKey::new(ty.type_id(), ty.name())
    }
}

/// One registered type.
pub struct Registration {
    id: u32,
    key: TypeKey,
    adapter: Arc<dyn Adapter>,
}

impl Registration {
    /// Class id written on the wire.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    pub fn adapter(&self) -> &dyn Adapter {
        &*self.adapter
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("adapter", &self.adapter.name())
            .finish()
    }
}

#[derive(Default)]
pub struct Registry {
    registrations: Vec<Registration>,
    by_type: HashMap<TypeId, u32>,
    enums: HashMap<TypeId, EnumType>,
    interfaces: Vec<Interface>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `adapter` for `T` and returns the class id.
    pub fn register<T: Object>(&mut self, adapter: impl Adapter) -> Result<u32> {
        self.register_key(TypeKey::of::<T>(), Arc::new(adapter))
    }

    pub fn register_key(&mut self, key: TypeKey, adapter: Arc<dyn Adapter>) -> Result<u32> {
        if self.by_type.contains_key(&key.type_id)
            || self.registrations.iter().any(|r| r.key.name == key.name)
        {
            return Err(GraphError::DuplicateRegistration(key.name.to_string()));
        }
        let id = u32::try_from(self.registrations.len())
            .map_err(|_| GraphError::Config("too many registrations".into()))?;
        debug!(id, ty = key.name, adapter = adapter.name(), "registered adapter");
        self.by_type.insert(key.type_id, id);
        self.registrations.push(Registration { id, key, adapter });
        Ok(id)
    }

    /// Maps every type in `keys` to the same adapter instance.
    pub fn register_all(&mut self, keys: &[TypeKey], adapter: Arc<dyn Adapter>) -> Result<()> {
        for key in keys {
            self.register_key(*key, Arc::clone(&adapter))?;
        }
        Ok(())
    }

    /// Registers an enum constant type with the by-name adapter and makes
    /// its [`EnumType`] available to enum containers.
    pub fn register_enum<E: EnumConstant>(&mut self) -> Result<u32> {
        let id = self.register::<E>(EnumNameAdapter::<E>::new())?;
        self.enums.insert(TypeId::of::<E>(), EnumType::of::<E>());
        Ok(id)
    }

    /// Makes an interface name resolvable by [`Registry::resolve_interface`].
    pub fn declare_interface(&mut self, interface: Interface) -> Result<()> {
        if self.interfaces.iter().any(|i| i.name() == interface.name()) {
            return Err(GraphError::DuplicateRegistration(interface.name().to_string()));
        }
        debug!(interface = interface.name(), "declared interface");
        self.interfaces.push(interface);
        Ok(())
    }

    /// Resolves a registered type by its full type name.
    pub fn resolve_name(&self, name: &str) -> Result<TypeKey> {
        self.registrations
            .iter()
            .find(|r| r.key.name == name)
            .map(|r| r.key)
            .ok_or_else(|| GraphError::ClassNotFound(name.to_string()))
    }

    pub fn resolve_interface(&self, name: &str) -> Result<Interface> {
        self.interfaces
            .iter()
            .find(|i| i.name() == name)
            .copied()
            .ok_or_else(|| GraphError::ClassNotFound(name.to_string()))
    }

    pub fn lookup(&self, type_id: TypeId) -> Option<&Registration> {
        self.by_type
            .get(&type_id)
            .and_then(|&id| self.registrations.get(id as usize))
    }

    pub fn get(&self, key: &TypeKey) -> Result<&Registration> {
        self.lookup(key.type_id)
            .ok_or(GraphError::UnregisteredType(key.name))
    }

    pub fn by_id(&self, id: u32) -> Result<&Registration> {
        self.registrations
            .get(id as usize)
            .ok_or(GraphError::UnknownTypeId(id))
    }

    pub fn enum_type(&self, type_id: TypeId) -> Option<EnumType> {
        self.enums.get(&type_id).copied()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.iter()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("registrations", &self.registrations)
            .field("interfaces", &self.interfaces)
            .finish()
    }
}
