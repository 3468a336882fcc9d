//! Immutable collections, rebuilt through their `copy_of` factories.
//!
//! Elements are read before the collection exists, so an element cannot
//! refer back to its own immutable container.

use graphpack_runtime::{
    ImmutableList, ImmutableMap, ImmutableSet, ImmutableSortedMap, ImmutableSortedSet, Obj, Value,
};

use crate::adapter::{
    collection_of, downcast, expect_obj, map_of, read_comparator, read_entries, read_values,
    write_comparator, write_entries, write_values, Adapter,
};
use crate::engine::{ReadContext, TypeKey, WriteContext};
use crate::Result;

pub struct ImmutableListAdapter;

impl Adapter for ImmutableListAdapter {
    fn name(&self) -> &'static str {
        "immutable-list"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        write_values(ctx, downcast::<ImmutableList>(value)?.as_slice())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let items = read_values(ctx, self.name())?;
        Ok(Value::obj(ImmutableList::copy_of(items)))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

pub struct ImmutableSetAdapter;

impl Adapter for ImmutableSetAdapter {
    fn name(&self) -> &'static str {
        "immutable-set"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        downcast::<ImmutableSet>(value)?;
        let items = collection_of(expect_obj(value)?)?.to_vec();
        write_values(ctx, &items)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let items = read_values(ctx, self.name())?;
        Ok(Value::obj(ImmutableSet::copy_of(items)))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// `[comparator][var size][elem]*`
pub struct ImmutableSortedSetAdapter;

impl Adapter for ImmutableSortedSetAdapter {
    fn name(&self) -> &'static str {
        "immutable-sorted-set"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let set = downcast::<ImmutableSortedSet>(value)?;
        write_comparator(ctx, set.comparator())?;
        let items = collection_of(expect_obj(value)?)?.to_vec();
        write_values(ctx, &items)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let comparator = read_comparator(ctx)?;
        let items = read_values(ctx, self.name())?;
        Ok(Value::obj(ImmutableSortedSet::copy_of_sorted(comparator, items)?))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

pub struct ImmutableMapAdapter;

impl Adapter for ImmutableMapAdapter {
    fn name(&self) -> &'static str {
        "immutable-map"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        downcast::<ImmutableMap>(value)?;
        let entries = map_of(expect_obj(value)?)?.entries();
        write_entries(ctx, &entries)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let entries = read_entries(ctx, self.name())?;
        Ok(Value::obj(ImmutableMap::copy_of(entries)))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// `[comparator][var size]([key][value])*`
pub struct ImmutableSortedMapAdapter;

impl Adapter for ImmutableSortedMapAdapter {
    fn name(&self) -> &'static str {
        "immutable-sorted-map"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let map = downcast::<ImmutableSortedMap>(value)?;
        write_comparator(ctx, map.comparator())?;
        let entries = map_of(expect_obj(value)?)?.entries();
        write_entries(ctx, &entries)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let comparator = read_comparator(ctx)?;
        let entries = read_entries(ctx, self.name())?;
        let map = ImmutableSortedMap::copy_of_sorted(comparator, entries)?;
        Ok(Value::Obj(Obj::new(map)))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}
