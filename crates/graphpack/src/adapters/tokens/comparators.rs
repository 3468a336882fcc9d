//! Comparators and dynamic proxies.

use graphpack_runtime::{NaturalOrder, Obj, Proxy, ReverseOrder, Value};

use crate::adapter::{downcast, downcast_obj, expect_obj, read_comparator, write_comparator, Adapter};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::{GraphError, Result};

/// A stateless singleton: no record, decoded to the one instance.
pub struct SingletonAdapter {
    name: &'static str,
    instance: fn() -> Obj,
}

impl SingletonAdapter {
    pub const fn new(name: &'static str, instance: fn() -> Obj) -> Self {
        Self { name, instance }
    }

    pub fn natural_order() -> Self {
        Self::new("natural-order", NaturalOrder::instance)
    }

    pub fn reverse_natural_order() -> Self {
        Self::new("reverse-natural-order", ReverseOrder::natural)
    }
}

impl Adapter for SingletonAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, _ctx: &mut WriteContext<'_>, _value: &Value) -> Result<()> {
        Ok(())
    }

    fn decode(&self, _ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        Ok(Value::Obj((self.instance)()))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// The wrapped comparator.
pub struct ReverseOrderAdapter;

impl Adapter for ReverseOrderAdapter {
    fn name(&self) -> &'static str {
        "reverse-order"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let reverse = downcast::<ReverseOrder>(value)?;
        write_comparator(ctx, Some(reverse.inner()))
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let inner = read_comparator(ctx)?.ok_or(GraphError::UnexpectedType {
            expected: "comparator",
            found: "null",
        })?;
        Ok(Value::Obj(ReverseOrder::of(Some(inner))?))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// `[handler][var n][interface name]*`
///
/// Interface names are resolved against the registry's declared
/// interfaces; an unknown name is [`GraphError::ClassNotFound`].
pub struct ProxyAdapter;

impl Adapter for ProxyAdapter {
    fn name(&self) -> &'static str {
        "proxy"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let proxy = downcast::<Proxy>(value)?;
        ctx.write_value(&Value::Obj(proxy.handler().clone()))?;
        ctx.output().var_usize(proxy.interfaces().len());
        for interface in proxy.interfaces() {
            ctx.output().str(interface.name());
        }
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let handler = ctx.read_value()?;
        let handler = expect_obj(&handler)?.clone();
        let len = ctx.read_len(self.name())?;
        let mut interfaces = Vec::with_capacity(len);
        for _ in 0..len {
            let name = ctx.input().str()?;
            interfaces.push(ctx.resolve_interface(name)?);
        }
        Ok(Value::Obj(Proxy::new(interfaces, handler)?))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let proxy = downcast_obj::<Proxy>(value)?;
        let handler = ctx.copy(&Value::Obj(proxy.handler().clone()))?;
        let copy = Proxy::new(proxy.interfaces().to_vec(), expect_obj(&handler)?.clone())?;
        ctx.reference(&copy);
        Ok(Value::Obj(copy))
    }
}
