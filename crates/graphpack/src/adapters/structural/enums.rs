//! Enum-keyed containers.
//!
//! Both record the enum type as a class id and each constant as its
//! ordinal, so the enum type must be registered with
//! [`Registry::register_enum`](crate::Registry::register_enum).

use graphpack_runtime::enums::none_of;
use graphpack_runtime::{EnumMap, EnumType, Introspect, JumboEnumSet, Obj, RegularEnumSet, Value};

use crate::access::FieldHandle;
use crate::adapter::{collection_of, downcast, downcast_obj, expect_obj, map_of, Adapter};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::variants::VariantTable;
use crate::{GraphError, Result};

type ElementTypeOf = Box<dyn Fn(&Obj) -> Result<EnumType> + Send + Sync>;

fn element_type_of<S: Introspect>() -> Result<(TypeKey, ElementTypeOf)> {
    let field = FieldHandle::<S, EnumType>::resolve("element_type")?;
    let read: ElementTypeOf = Box::new(move |obj: &Obj| Ok(*field.get(downcast_obj::<S>(obj)?)));
    Ok((TypeKey::of::<S>(), read))
}

fn ordinal_of(element_type: &EnumType, value: &Value) -> Result<usize> {
    value
        .as_obj()
        .and_then(|obj| element_type.ordinal(obj))
        .ok_or(GraphError::UnexpectedType {
            expected: element_type.name(),
            found: value.kind_name(),
        })
}

fn constant_at(element_type: &EnumType, ordinal: usize, kind: &'static str) -> Result<Obj> {
    element_type.constant(ordinal).ok_or_else(|| {
        GraphError::invalid_record(
            kind,
            format!("ordinal {ordinal} out of range for {}", element_type.name()),
        )
    })
}

/// `[class element type][var size][var ordinal]*`
///
/// One adapter serves both set representations; the element type is
/// private to each, so it is read through a field handle picked by the
/// set's exact type.
pub struct EnumSetAdapter {
    representations: VariantTable<TypeKey, ElementTypeOf>,
}

impl EnumSetAdapter {
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            representations: VariantTable::build(
                "enum set",
                [
                    element_type_of::<RegularEnumSet>()?,
                    element_type_of::<JumboEnumSet>()?,
                ],
            ),
        })
    }

    fn element_type(&self, obj: &Obj) -> Result<EnumType> {
        let key = TypeKey::new(obj.concrete_type_id(), obj.type_name());
        (self.representations.get(&key)?)(obj)
    }
}

impl Adapter for EnumSetAdapter {
    fn name(&self) -> &'static str {
        "enum-set"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let obj = expect_obj(value)?;
        let element_type = self.element_type(obj)?;
        ctx.write_class(&TypeKey::from(element_type))?;
        let items = collection_of(obj)?.to_vec();
        ctx.output().var_usize(items.len());
        for item in &items {
            let ordinal = ordinal_of(&element_type, item)?;
            ctx.output().var_usize(ordinal);
        }
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let class = ctx.read_class()?;
        let element_type = ctx.enum_type(&class)?;
        let len = ctx.read_len(self.name())?;
        let obj = none_of(element_type);
        ctx.reference(&obj);
        let set = collection_of(&obj)?;
        for _ in 0..len {
            let ordinal = ctx.input().var_usize()?;
            set.add(Value::Obj(constant_at(&element_type, ordinal, self.name())?))?;
        }
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let copy = none_of(self.element_type(value)?);
        ctx.reference(&copy);
        let set = collection_of(&copy)?;
        for item in collection_of(value)?.to_vec() {
            set.add(item)?;
        }
        Ok(Value::Obj(copy))
    }
}

/// `[class key type][var size]([var ordinal][value])*`
pub struct EnumMapAdapter;

impl Adapter for EnumMapAdapter {
    fn name(&self) -> &'static str {
        "enum-map"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let key_type = downcast::<EnumMap>(value)?.key_type();
        ctx.write_class(&TypeKey::from(key_type))?;
        let entries = map_of(expect_obj(value)?)?.entries();
        ctx.output().var_usize(entries.len());
        for (key, value) in &entries {
            let ordinal = ordinal_of(&key_type, key)?;
            ctx.output().var_usize(ordinal);
            ctx.write_value(value)?;
        }
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let class = ctx.read_class()?;
        let key_type = ctx.enum_type(&class)?;
        let len = ctx.read_len(self.name())?;
        let obj = Obj::new(EnumMap::new(key_type));
        ctx.reference(&obj);
        let map = map_of(&obj)?;
        for _ in 0..len {
            let key = constant_at(&key_type, ctx.input().var_usize()?, self.name())?;
            map.put(Value::Obj(key), ctx.read_value()?)?;
        }
        Ok(Value::Obj(obj))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let original = downcast_obj::<EnumMap>(value)?;
        let copy = Obj::new(EnumMap::new(original.key_type()));
        ctx.reference(&copy);
        let map = map_of(&copy)?;
        for (key, value) in map_of(value)?.entries() {
            map.put(key, ctx.copy(&value)?)?;
        }
        Ok(Value::Obj(copy))
    }
}
