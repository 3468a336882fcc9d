use std::marker::PhantomData;

use graphpack_runtime::{EnumConstant, Value};

use crate::adapter::{downcast, Adapter};
use crate::engine::{ReadContext, TypeKey, WriteContext};
use crate::{GraphError, Result};

/// Constant name of a closed enum; an unknown name is an error.
pub struct EnumNameAdapter<E> {
    marker: PhantomData<fn() -> E>,
}

impl<E: EnumConstant> EnumNameAdapter<E> {
    pub fn new() -> Self {
        Self {
            marker: PhantomData,
        }
    }
}

impl<E: EnumConstant> Default for EnumNameAdapter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnumConstant> Adapter for EnumNameAdapter<E> {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let constant = downcast::<E>(value)?;
        ctx.output().str(constant.name());
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let name = ctx.input().str()?;
        let constant = E::by_name(name).ok_or_else(|| GraphError::UnknownEnumConstant {
            ty: std::any::type_name::<E>(),
            constant: name.to_string(),
        })?;
        Ok(Value::Obj(constant.canonical()))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}
