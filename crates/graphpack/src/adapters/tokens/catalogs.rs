//! Tokens resolved against a catalog of canonical instances.
//!
//! Catalogs are open: a token the running process does not know decodes to
//! null and is logged, since the writer may have had a newer catalog.

use std::sync::OnceLock;

use encoding_rs::Encoding;
use graphpack_runtime::{Currency, Locale, Obj, TimeZone, UnicodeBlock, Value};
use tracing::info;

use crate::adapter::{downcast, Adapter};
use crate::catalog::ConstantCatalog;
use crate::engine::{ReadContext, TypeKey, WriteContext};
use crate::{GraphError, Result};

/// ISO 4217 code as an optional string; null is written as absence.
pub struct CurrencyAdapter;

impl Adapter for CurrencyAdapter {
    fn name(&self) -> &'static str {
        "currency"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let code = match value {
            Value::Null => None,
            other => Some(downcast::<Currency>(other)?.code()),
        };
        ctx.output().str_opt(code);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let Some(code) = ctx.input().str_opt()? else {
            return Ok(Value::Null);
        };
        Ok(match Currency::get_instance(code) {
            Some(currency) => Value::Obj(currency),
            None => {
                info!(code, "unknown currency code, decoding as null");
                Value::Null
            }
        })
    }

    fn accepts_null(&self) -> bool {
        true
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// `[language][country][variant]`, interned on decode.
pub struct LocaleAdapter;

impl Adapter for LocaleAdapter {
    fn name(&self) -> &'static str {
        "locale"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let locale = downcast::<Locale>(value)?;
        let out = ctx.output();
        out.str(locale.language());
        out.str(locale.country());
        out.str(locale.variant());
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let input = ctx.input();
        let language = input.str()?;
        let country = input.str()?;
        let variant = input.str()?;
        Ok(Value::Obj(Locale::new(language, country, variant)))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// The zone id.
pub struct TimeZoneAdapter;

impl Adapter for TimeZoneAdapter {
    fn name(&self) -> &'static str {
        "time-zone"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let zone = downcast::<TimeZone>(value)?;
        ctx.output().str(zone.id());
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let id = ctx.input().str()?;
        Ok(match TimeZone::for_id(id) {
            Some(zone) => Value::Obj(zone),
            None => {
                info!(id, "unknown time zone, decoding as null");
                Value::Null
            }
        })
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// The block's constant name.
///
/// Blocks have no public name lookup; the name table is built once from
/// the published statics.
#[derive(Default)]
pub struct UnicodeBlockAdapter {
    catalog: OnceLock<Result<ConstantCatalog<UnicodeBlock>>>,
}

impl UnicodeBlockAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn catalog(&self) -> Result<&ConstantCatalog<UnicodeBlock>> {
        self.catalog
            .get_or_init(ConstantCatalog::build)
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl Adapter for UnicodeBlockAdapter {
    fn name(&self) -> &'static str {
        "unicode-block"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let block = downcast::<UnicodeBlock>(value)?;
        let name = self.catalog()?.name_of(block).ok_or_else(|| {
            GraphError::invalid_record(self.name(), "block is not a published constant")
        })?;
        ctx.output().str(name);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let name = ctx.input().str()?;
        Ok(match self.catalog()?.get(name) {
            Some(block) => Value::Obj(block),
            None => {
                info!(name, "unknown unicode block, decoding as null");
                Value::Null
            }
        })
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// Canonical charset name; any registered label resolves back to the same
/// static encoding.
pub struct CharsetAdapter;

impl Adapter for CharsetAdapter {
    fn name(&self) -> &'static str {
        "charset"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let name = downcast::<Encoding>(value)?.name();
        ctx.output().str(name);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let label = ctx.input().str()?;
        Ok(match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => Value::Obj(Obj::canonical(encoding)),
            None => {
                info!(label, "unknown charset, decoding as null");
                Value::Null
            }
        })
    }

    fn is_immutable(&self) -> bool {
        true
    }
}
