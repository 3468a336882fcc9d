//! The adapter contract and helpers shared by the built-in adapters.

use graphpack_runtime::{Collection, List, Map, Obj, Object, Value};

use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::{GraphError, Result};

/// Converts one family of runtime types to and from a byte record.
///
/// # Contract
///
/// * `encode` writes a self-delimiting record. Unless [`accepts_null`]
///   is true the engine never passes [`Value::Null`].
/// * `decode` consumes exactly the bytes `encode` wrote and returns a value
///   equal in observable state. Containers call
///   [`ReadContext::reference`] as soon as the new instance exists, before
///   reading children, so cycles resolve to it.
/// * `duplicate` builds a deep copy. Containers register the fresh instance
///   with [`CopyContext::reference`] before copying children. The engine
///   never asks an [`is_immutable`] adapter to copy; it shares the value.
///
/// Adapters are shared across engines and threads and keep no per-call
/// state.
///
/// [`accepts_null`]: Adapter::accepts_null
/// [`is_immutable`]: Adapter::is_immutable
pub trait Adapter: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()>;

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, ty: &TypeKey) -> Result<Value>;

    fn duplicate(&self, _ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        if self.is_immutable() {
            return Ok(Value::Obj(value.clone()));
        }
        Err(GraphError::CopyUnsupported(self.name()))
    }

    fn accepts_null(&self) -> bool {
        false
    }

    fn is_immutable(&self) -> bool {
        false
    }
}

pub fn expect_obj(value: &Value) -> Result<&Obj> {
    value.as_obj().ok_or(GraphError::UnexpectedType {
        expected: "object",
        found: value.kind_name(),
    })
}

/// The concrete `T` behind `value`.
pub fn downcast<T: Object>(value: &Value) -> Result<&T> {
    downcast_obj(expect_obj(value)?)
}

pub fn downcast_obj<T: Object>(obj: &Obj) -> Result<&T> {
    obj.downcast_ref::<T>().ok_or(GraphError::UnexpectedType {
        expected: std::any::type_name::<T>(),
        found: obj.type_name(),
    })
}

pub fn collection_of(obj: &Obj) -> Result<&dyn Collection> {
    obj.get().as_collection().ok_or(GraphError::UnexpectedType {
        expected: "collection",
        found: obj.type_name(),
    })
}

pub fn list_of(obj: &Obj) -> Result<&dyn List> {
    obj.get().as_list().ok_or(GraphError::UnexpectedType {
        expected: "list",
        found: obj.type_name(),
    })
}

pub fn map_of(obj: &Obj) -> Result<&dyn Map> {
    obj.get().as_map().ok_or(GraphError::UnexpectedType {
        expected: "map",
        found: obj.type_name(),
    })
}

/// An optional comparator: null or an object with the comparator capability.
pub fn comparator_of(value: Value) -> Result<Option<Obj>> {
    match value {
        Value::Null => Ok(None),
        Value::Obj(obj) if obj.get().as_comparator().is_some() => Ok(Some(obj)),
        other => Err(GraphError::UnexpectedType {
            expected: "comparator",
            found: other.kind_name(),
        }),
    }
}

pub fn write_comparator(ctx: &mut WriteContext<'_>, comparator: Option<&Obj>) -> Result<()> {
    ctx.write_value(&comparator.cloned().map_or(Value::Null, Value::Obj))
}

pub fn read_comparator(ctx: &mut ReadContext<'_, '_>) -> Result<Option<Obj>> {
    comparator_of(ctx.read_value()?)
}

/// `[var len][value]*`
pub fn write_values(ctx: &mut WriteContext<'_>, items: &[Value]) -> Result<()> {
    ctx.output().var_usize(items.len());
    for item in items {
        ctx.write_value(item)?;
    }
    Ok(())
}

/// `[var len]([key][value])*`
pub fn write_entries(ctx: &mut WriteContext<'_>, entries: &[(Value, Value)]) -> Result<()> {
    ctx.output().var_usize(entries.len());
    for (key, value) in entries {
        ctx.write_value(key)?;
        ctx.write_value(value)?;
    }
    Ok(())
}

pub fn read_values(ctx: &mut ReadContext<'_, '_>, kind: &'static str) -> Result<Vec<Value>> {
    let len = ctx.read_len(kind)?;
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        items.push(ctx.read_value()?);
    }
    Ok(items)
}

pub fn read_entries(ctx: &mut ReadContext<'_, '_>, kind: &'static str) -> Result<Vec<(Value, Value)>> {
    let len = ctx.read_len(kind)?;
    let mut entries = Vec::with_capacity(len);
    for _ in 0..len {
        let key = ctx.read_value()?;
        let value = ctx.read_value()?;
        entries.push((key, value));
    }
    Ok(entries)
}
