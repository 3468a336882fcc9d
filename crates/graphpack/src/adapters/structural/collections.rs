//! Growable lists, sets and maps rebuilt through their public API.

use graphpack_runtime::{
    ArrayList, HashMap, HashSet, LinkedHashMap, LinkedHashSet, LinkedList, Obj, TreeMap, TreeSet,
    Value,
};

use crate::adapter::{
    collection_of, downcast, downcast_obj, expect_obj, map_of, read_comparator, write_comparator,
    write_entries, write_values, Adapter,
};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::Result;

/// `[var size][elem]*` for any collection built empty and filled with `add`.
pub struct CollectionAdapter {
    name: &'static str,
    create: fn() -> Obj,
}

impl CollectionAdapter {
    pub const fn new(name: &'static str, create: fn() -> Obj) -> Self {
        Self { name, create }
    }

    pub fn array_list() -> Self {
        Self::new("array-list", || Obj::new(ArrayList::new()))
    }

    pub fn linked_list() -> Self {
        Self::new("linked-list", || Obj::new(LinkedList::new()))
    }

    pub fn hash_set() -> Self {
        Self::new("hash-set", || Obj::new(HashSet::new()))
    }

    pub fn linked_hash_set() -> Self {
        Self::new("linked-hash-set", || Obj::new(LinkedHashSet::new()))
    }
}

impl Adapter for CollectionAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let items = collection_of(expect_obj(value)?)?.to_vec();
        write_values(ctx, &items)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let len = ctx.read_len(self.name)?;
        let obj = (self.create)();
        ctx.reference(&obj);
        let collection = collection_of(&obj)?;
        for _ in 0..len {
            collection.add(ctx.read_value()?)?;
        }
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let items = collection_of(value)?.to_vec();
        let copy = (self.create)();
        ctx.reference(&copy);
        let collection = collection_of(&copy)?;
        for item in &items {
            collection.add(ctx.copy(item)?)?;
        }
        Ok(Value::Obj(copy))
    }
}

/// `[var size]([key][value])*` for maps built empty and filled with `put`.
pub struct MapAdapter {
    name: &'static str,
    create: fn() -> Obj,
}

impl MapAdapter {
    pub const fn new(name: &'static str, create: fn() -> Obj) -> Self {
        Self { name, create }
    }

    pub fn hash_map() -> Self {
        Self::new("hash-map", || Obj::new(HashMap::new()))
    }

    pub fn linked_hash_map() -> Self {
        Self::new("linked-hash-map", || Obj::new(LinkedHashMap::new()))
    }
}

impl Adapter for MapAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let entries = map_of(expect_obj(value)?)?.entries();
        write_entries(ctx, &entries)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let len = ctx.read_len(self.name)?;
        let obj = (self.create)();
        ctx.reference(&obj);
        fill_map(ctx, &obj, len)?;
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let copy = (self.create)();
        ctx.reference(&copy);
        copy_entries(ctx, value, &copy)?;
        Ok(Value::Obj(copy))
    }
}

pub(crate) fn fill_map(ctx: &mut ReadContext<'_, '_>, obj: &Obj, len: usize) -> Result<()> {
    let map = map_of(obj)?;
    for _ in 0..len {
        let key = ctx.read_value()?;
        let value = ctx.read_value()?;
        map.put(key, value)?;
    }
    Ok(())
}

pub(crate) fn copy_entries(ctx: &mut CopyContext<'_>, from: &Obj, to: &Obj) -> Result<()> {
    let entries = map_of(from)?.entries();
    let map = map_of(to)?;
    for (key, value) in &entries {
        map.put(ctx.copy(key)?, ctx.copy(value)?)?;
    }
    Ok(())
}

/// `[comparator][var size][elem]*`
pub struct TreeSetAdapter;

impl Adapter for TreeSetAdapter {
    fn name(&self) -> &'static str {
        "tree-set"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let set = downcast::<TreeSet>(value)?;
        write_comparator(ctx, set.comparator())?;
        let items = collection_of(expect_obj(value)?)?.to_vec();
        write_values(ctx, &items)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let comparator = read_comparator(ctx)?;
        let len = ctx.read_len(self.name())?;
        let obj = Obj::new(TreeSet::with_comparator(comparator)?);
        ctx.reference(&obj);
        let set = collection_of(&obj)?;
        for _ in 0..len {
            set.add(ctx.read_value()?)?;
        }
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let comparator = downcast_obj::<TreeSet>(value)?.comparator().cloned();
        let copy = Obj::new(TreeSet::with_comparator(comparator)?);
        ctx.reference(&copy);
        let set = collection_of(&copy)?;
        for item in collection_of(value)?.to_vec() {
            set.add(ctx.copy(&item)?)?;
        }
        Ok(Value::Obj(copy))
    }
}

/// `[comparator][var size]([key][value])*`
pub struct TreeMapAdapter;

impl Adapter for TreeMapAdapter {
    fn name(&self) -> &'static str {
        "tree-map"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let map = downcast::<TreeMap>(value)?;
        write_comparator(ctx, map.comparator())?;
        let entries = map_of(expect_obj(value)?)?.entries();
        write_entries(ctx, &entries)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let comparator = read_comparator(ctx)?;
        let len = ctx.read_len(self.name())?;
        let obj = Obj::new(TreeMap::with_comparator(comparator)?);
        ctx.reference(&obj);
        fill_map(ctx, &obj, len)?;
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let comparator = downcast_obj::<TreeMap>(value)?.comparator().cloned();
        let copy = Obj::new(TreeMap::with_comparator(comparator)?);
        ctx.reference(&copy);
        copy_entries(ctx, value, &copy)?;
        Ok(Value::Obj(copy))
    }
}
