use std::cell::{Cell, RefCell};

use graphpack_runtime::{sub_list, FixedSizeList, Introspect, Obj, RandomAccessSubList, SubList, Value};

use crate::access::FieldHandle;
use crate::adapter::{downcast, downcast_obj, expect_obj, list_of, Adapter};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::variants::VariantTable;
use crate::Result;

/// Parent list and bounds of a sub-list view.
struct Bounds {
    parent: Obj,
    from: usize,
    to: usize,
}

type BoundsOf = Box<dyn Fn(&Obj) -> Result<Bounds> + Send + Sync>;

fn bounds_of<V: Introspect>() -> Result<(TypeKey, BoundsOf)> {
    let parent = FieldHandle::<V, Obj>::resolve("parent")?;
    let offset = FieldHandle::<V, usize>::resolve("offset")?;
    let size = FieldHandle::<V, Cell<usize>>::resolve("size")?;
    let read: BoundsOf = Box::new(move |obj: &Obj| {
        let view = downcast_obj::<V>(obj)?;
        let from = *offset.get(view);
        Ok(Bounds {
            parent: parent.get(view).clone(),
            from,
            to: from + size.get(view).get(),
        })
    });
    Ok((TypeKey::of::<V>(), read))
}

/// `[parent][var from][var to]`
///
/// Decoding reserves a placeholder for the view before reading the parent,
/// and re-creates the view over the decoded parent, so writes through it
/// stay visible in the parent.
pub struct SubListAdapter {
    views: VariantTable<TypeKey, BoundsOf>,
}

impl SubListAdapter {
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            views: VariantTable::build(
                "sub-list",
                [bounds_of::<SubList>()?, bounds_of::<RandomAccessSubList>()?],
            ),
        })
    }

    fn bounds(&self, obj: &Obj) -> Result<Bounds> {
        let key = TypeKey::new(obj.concrete_type_id(), obj.type_name());
        (self.views.get(&key)?)(obj)
    }
}

impl Adapter for SubListAdapter {
    fn name(&self) -> &'static str {
        "sub-list"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let bounds = self.bounds(expect_obj(value)?)?;
        ctx.write_value(&Value::Obj(bounds.parent))?;
        ctx.output().var_usize(bounds.from);
        ctx.output().var_usize(bounds.to);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let placeholder = ctx.reserve_placeholder();
        let parent = ctx.read_value()?;
        let from = ctx.input().var_usize()?;
        let to = ctx.input().var_usize()?;
        let view = sub_list(expect_obj(&parent)?, from, to)?;
        ctx.fulfil(placeholder, &view)?;
        Ok(Value::Obj(view))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let bounds = self.bounds(value)?;
        let parent = ctx.copy(&Value::Obj(bounds.parent))?;
        let view = sub_list(expect_obj(&parent)?, bounds.from, bounds.to)?;
        ctx.reference(&view);
        Ok(Value::Obj(view))
    }
}

/// `[var len][elem]*`, read from the list's backing array.
pub struct FixedSizeListAdapter {
    array: FieldHandle<FixedSizeList, RefCell<Box<[Value]>>>,
}

impl FixedSizeListAdapter {
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            array: FieldHandle::resolve("array")?,
        })
    }

    fn items(&self, list: &FixedSizeList) -> Vec<Value> {
        self.array.get(list).borrow().to_vec()
    }
}

impl Adapter for FixedSizeListAdapter {
    fn name(&self) -> &'static str {
        "fixed-size-list"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let items = self.items(downcast::<FixedSizeList>(value)?);
        crate::adapter::write_values(ctx, &items)
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let len = ctx.read_len(self.name())?;
        let obj = Obj::new(FixedSizeList::from_array(vec![Value::Null; len]));
        ctx.reference(&obj);
        let list = list_of(&obj)?;
        for index in 0..len {
            list.set(index, ctx.read_value()?)?;
        }
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let items = self.items(downcast_obj::<FixedSizeList>(value)?);
        let copy = Obj::new(FixedSizeList::from_array(vec![Value::Null; items.len()]));
        ctx.reference(&copy);
        let list = list_of(&copy)?;
        for (index, item) in items.iter().enumerate() {
            list.set(index, ctx.copy(item)?)?;
        }
        Ok(Value::Obj(copy))
    }
}
