use graphpack_runtime::{Introspect, Obj, RuntimeError, Synchronized, Unmodifiable, Value, WrapperKind};
use parking_lot::ReentrantMutexGuard;

use crate::access::FieldHandle;
use crate::adapter::{downcast, downcast_obj, expect_obj, Adapter};
use crate::engine::{CopyContext, ReadContext, TypeKey, WriteContext};
use crate::variants::VariantTable;
use crate::Result;

/// A view type holding a private delegate behind one of several
/// [`WrapperKind`]s.
pub trait Wrapper: Introspect {
    const NAME: &'static str;

    fn wrapper_kind(&self) -> WrapperKind;

    /// Wraps `delegate` again with the public factory for `kind`.
    fn rewrap(kind: WrapperKind, delegate: Obj) -> std::result::Result<Obj, RuntimeError>;

    /// Lock to hold while the delegate is read.
    fn monitor(&self) -> Option<ReentrantMutexGuard<'_, ()>> {
        None
    }
}

impl Wrapper for Synchronized {
    const NAME: &'static str = "synchronized";

    fn wrapper_kind(&self) -> WrapperKind {
        self.kind()
    }

    fn rewrap(kind: WrapperKind, delegate: Obj) -> std::result::Result<Obj, RuntimeError> {
        Synchronized::wrap(kind, delegate)
    }

    fn monitor(&self) -> Option<ReentrantMutexGuard<'_, ()>> {
        Some(self.lock())
    }
}

impl Wrapper for Unmodifiable {
    const NAME: &'static str = "unmodifiable";

    fn wrapper_kind(&self) -> WrapperKind {
        self.kind()
    }

    fn rewrap(kind: WrapperKind, delegate: Obj) -> std::result::Result<Obj, RuntimeError> {
        Unmodifiable::wrap(kind, delegate)
    }
}

/// `[var discriminator][delegate]`
///
/// The discriminator indexes the wrapper kinds in declaration order.
///
/// The delegate is read before the wrapper exists, so a delegate that
/// refers back to its own wrapper fails to decode with
/// [`UnresolvedReference`](crate::GraphError::UnresolvedReference), and a
/// copy rebuilds such a wrapper once per path that reaches it.
pub struct WrapperAdapter<W: Wrapper> {
    delegate: FieldHandle<W, Obj>,
    kinds: VariantTable<WrapperKind, ()>,
}

pub type SynchronizedAdapter = WrapperAdapter<Synchronized>;
pub type UnmodifiableAdapter = WrapperAdapter<Unmodifiable>;

impl<W: Wrapper> WrapperAdapter<W> {
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            delegate: FieldHandle::resolve("delegate")?,
            kinds: VariantTable::of_keys(
                W::NAME,
                [
                    WrapperKind::Collection,
                    WrapperKind::List,
                    WrapperKind::RandomAccessList,
                    WrapperKind::Set,
                    WrapperKind::SortedSet,
                    WrapperKind::Map,
                    WrapperKind::SortedMap,
                ],
            ),
        })
    }
}

impl<W: Wrapper> Adapter for WrapperAdapter<W> {
    fn name(&self) -> &'static str {
        W::NAME
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let wrapper = downcast::<W>(value)?;
        let discriminator = self.kinds.discriminator(&wrapper.wrapper_kind())?;
        ctx.output().var_usize(discriminator);
        let _guard = wrapper.monitor();
        ctx.write_value(&Value::Obj(self.delegate.get(wrapper).clone()))
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let discriminator = ctx.input().var_usize()?;
        let (&kind, _) = self.kinds.by_discriminator(discriminator)?;
        let delegate = ctx.read_value()?;
        let delegate = expect_obj(&delegate)?.clone();
        Ok(Value::Obj(W::rewrap(kind, delegate)?))
    }

    fn duplicate(&self, ctx: &mut CopyContext<'_>, value: &Obj) -> Result<Value> {
        let wrapper = downcast_obj::<W>(value)?;
        let delegate = {
            let _guard = wrapper.monitor();
            ctx.copy(&Value::Obj(self.delegate.get(wrapper).clone()))?
        };
        let delegate = expect_obj(&delegate)?.clone();
        Ok(Value::Obj(W::rewrap(wrapper.wrapper_kind(), delegate)?))
    }
}
