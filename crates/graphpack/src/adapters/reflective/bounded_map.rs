use graphpack_runtime::{BoundedMap, Obj, Value};

use crate::access::FieldHandle;
use crate::adapter::{downcast, downcast_obj, expect_obj, map_of, write_entries, Adapter};
use crate::adapters::structural::{copy_entries, fill_map};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::Result;

/// `[var capacity][var size]([key][value])*`
///
/// The capacity has no public accessor; without it a decoded map would
/// accept a different number of entries.
pub struct BoundedMapAdapter {
    capacity: FieldHandle<BoundedMap, usize>,
}

impl BoundedMapAdapter {
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            capacity: FieldHandle::resolve("capacity")?,
        })
    }
}

impl Adapter for BoundedMapAdapter {
    fn name(&self) -> &'static str {
        "bounded-map"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let map = downcast::<BoundedMap>(value)?;
        ctx.output().var_usize(*self.capacity.get(map));
        let entries = map_of(expect_obj(value)?)?.entries();
        write_entries(ctx, &entries)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let capacity = ctx.input().var_usize()?;
        let len = ctx.read_len(self.name())?;
        let obj = Obj::new(BoundedMap::new(capacity));
        ctx.reference(&obj);
        fill_map(ctx, &obj, len)?;
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let capacity = *self.capacity.get(downcast_obj::<BoundedMap>(value)?);
        let copy = Obj::new(BoundedMap::new(capacity));
        ctx.reference(&copy);
        copy_entries(ctx, value, &copy)?;
        Ok(Value::Obj(copy))
    }
}
