//! Value types with a compact textual or numeric token.

use std::net::IpAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use graphpack_runtime::Value;
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::adapter::{downcast, Adapter};
use crate::engine::{ReadContext, TypeKey, WriteContext};
use crate::{GraphError, Result};

/// Two fixed 64-bit halves, most significant first.
pub struct UuidAdapter;

impl Adapter for UuidAdapter {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let bits = downcast::<Uuid>(value)?.as_u128();
        ctx.output().u64((bits >> 64) as u64);
        ctx.output().u64(bits as u64);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let most = ctx.input().u64()?;
        let least = ctx.input().u64()?;
        Ok(Value::obj(Uuid::from_u128(
            (u128::from(most) << 64) | u128::from(least),
        )))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// The pattern source, recompiled on decode.
pub struct RegexAdapter;

impl Adapter for RegexAdapter {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let pattern = downcast::<Regex>(value)?.as_str();
        ctx.output().str(pattern);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let pattern = ctx.input().str()?;
        let regex = Regex::new(pattern)
            .map_err(|e| GraphError::invalid_record(self.name(), e.to_string()))?;
        Ok(Value::obj(regex))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// `[var_i64 seconds][var nanos]` relative to the Unix epoch, with the
/// nanoseconds always counting forward.
pub struct SystemTimeAdapter;

impl Adapter for SystemTimeAdapter {
    fn name(&self) -> &'static str {
        "system-time"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let time = downcast::<SystemTime>(value)?;
        let overflow = || GraphError::invalid_record("system-time", "seconds out of range");
        let (seconds, nanos) = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => (
                i64::try_from(after.as_secs()).map_err(|_| overflow())?,
                after.subsec_nanos(),
            ),
            Err(before) => {
                let before = before.duration();
                let seconds = i64::try_from(before.as_secs()).map_err(|_| overflow())?;
                match before.subsec_nanos() {
                    0 => (-seconds, 0),
                    n => (-seconds - 1, NANOS_PER_SEC - n),
                }
            }
        };
        ctx.output().var_i64(seconds);
        ctx.output().var_u32(nanos);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let seconds = ctx.input().var_i64()?;
        let nanos = ctx.input().var_u32()?;
        if nanos >= NANOS_PER_SEC {
            return Err(GraphError::invalid_record(self.name(), format!("{nanos} nanoseconds")));
        }
        let whole = Duration::from_secs(seconds.unsigned_abs());
        let time = if seconds >= 0 {
            UNIX_EPOCH.checked_add(whole)
        } else {
            UNIX_EPOCH.checked_sub(whole)
        }
        .and_then(|t| t.checked_add(Duration::from_nanos(u64::from(nanos))))
        .ok_or_else(|| GraphError::invalid_record(self.name(), "time out of range"))?;
        Ok(Value::obj(time))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// The textual address.
pub struct IpAddrAdapter;

impl Adapter for IpAddrAdapter {
    fn name(&self) -> &'static str {
        "ip-addr"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let addr = downcast::<IpAddr>(value)?.to_string();
        ctx.output().str(&addr);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let text = ctx.input().str()?;
        let addr = text
            .parse::<IpAddr>()
            .map_err(|e| GraphError::invalid_record(self.name(), e.to_string()))?;
        Ok(Value::obj(addr))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

/// The serialized URI, parsed again on decode.
pub struct UriAdapter;

impl Adapter for UriAdapter {
    fn name(&self) -> &'static str {
        "uri"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let uri = downcast::<Url>(value)?;
        ctx.output().str(uri.as_str());
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> Result<Value> {
        let text = ctx.input().str()?;
        let uri =
            Url::parse(text).map_err(|e| GraphError::invalid_record(self.name(), e.to_string()))?;
        Ok(Value::obj(uri))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}
