//! Opaque-token adapters.
//!
//! Each value is written as a small token (an id, a code, a name) and
//! decoded through the type's canonical factory, so catalog instances keep
//! their identity. All of them are immutable: copies share the original.

mod catalogs;
mod comparators;
mod enum_name;
mod scalars;

pub use catalogs::{
    CharsetAdapter, CurrencyAdapter, LocaleAdapter, TimeZoneAdapter, UnicodeBlockAdapter,
};
pub use comparators::{ProxyAdapter, ReverseOrderAdapter, SingletonAdapter};
pub use enum_name::EnumNameAdapter;
pub use scalars::{IpAddrAdapter, RegexAdapter, SystemTimeAdapter, UriAdapter, UuidAdapter};

use std::net::IpAddr;
use std::time::SystemTime;

use encoding_rs::Encoding;
use graphpack_runtime::{
    Currency, Locale, NaturalOrder, Proxy, ReverseNaturalOrder, ReverseOrder, TimeZone,
    UnicodeBlock,
};
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::engine::Registry;
use crate::Result;

pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register::<Uuid>(UuidAdapter)?;
    registry.register::<Regex>(RegexAdapter)?;
    registry.register::<SystemTime>(SystemTimeAdapter)?;
    registry.register::<IpAddr>(IpAddrAdapter)?;
    registry.register::<Url>(UriAdapter)?;
    registry.register::<Currency>(CurrencyAdapter)?;
    registry.register::<Locale>(LocaleAdapter)?;
    registry.register::<TimeZone>(TimeZoneAdapter)?;
    registry.register::<UnicodeBlock>(UnicodeBlockAdapter::new())?;
    registry.register::<Encoding>(CharsetAdapter)?;
    registry.register::<NaturalOrder>(SingletonAdapter::natural_order())?;
    registry.register::<ReverseNaturalOrder>(SingletonAdapter::reverse_natural_order())?;
    registry.register::<ReverseOrder>(ReverseOrderAdapter)?;
    registry.register::<Proxy>(ProxyAdapter)?;
    Ok(())
}
