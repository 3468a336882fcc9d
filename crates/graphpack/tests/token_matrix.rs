//! Opaque-token adapters: values travel as a code, id or name.

use std::net::IpAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use graphpack::adapters::{self, tokens::EnumNameAdapter};
use graphpack::{downcast, Adapter, Engine, EngineConfig, GraphError, ReadContext, Registry};
use graphpack::{TypeKey, WriteContext};
use graphpack_buffers::Writer;
use graphpack_runtime::{
    enum_constants, Currency, EnumConstant, Interface, InvocationHandler, Locale, NaturalOrder, Obj,
    Object, Proxy, ReverseOrder, RuntimeError, TimeZone, UnicodeBlock, Value,
};
use encoding_rs::Encoding;
use regex::Regex;
use url::Url;
use uuid::Uuid;

const GREETER: Interface = Interface::new("Greeter");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Green,
}
enum_constants!(Color { Red, Green });

/// Answers every call with its greeting.
#[derive(Debug)]
struct Echo {
    greeting: String,
}

impl Object for Echo {
    fn as_invocation_handler(&self) -> Option<&dyn InvocationHandler> {
        Some(self)
    }
}

impl InvocationHandler for Echo {
    fn invoke(&self, _interface: &str, method: &str, _args: &[Value]) -> Result<Value, RuntimeError> {
        Ok(Value::from(format!("{} from {method}", self.greeting)))
    }
}

struct EchoAdapter;

impl Adapter for EchoAdapter {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> graphpack::Result<()> {
        ctx.output().str(&downcast::<Echo>(value)?.greeting);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> graphpack::Result<Value> {
        let greeting = ctx.input().str()?.to_string();
        Ok(Value::obj(Echo { greeting }))
    }

    fn duplicate(&self, ctx: &mut graphpack::CopyContext<'_>, value: &Obj) -> graphpack::Result<Value> {
        let greeting = graphpack::downcast_obj::<Echo>(value)?.greeting.clone();
        let copy = Obj::new(Echo { greeting });
        ctx.reference(&copy);
        Ok(Value::Obj(copy))
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    adapters::register_defaults(&mut registry).unwrap();
    registry.register_enum::<Color>().unwrap();
    registry.register::<Echo>(EchoAdapter).unwrap();
    registry
}

fn engine() -> Engine {
    let mut registry = registry();
    registry.declare_interface(GREETER).unwrap();
    Engine::new(registry, EngineConfig::default()).unwrap()
}

fn round_trip(engine: &Engine, value: &Value) -> Value {
    let bytes = engine.encode(value).unwrap();
    engine.decode(&bytes).unwrap()
}

/// An object record for `T` followed by a hand-written token.
fn record<T: 'static>(engine: &Engine, token: impl FnOnce(&mut Writer)) -> Vec<u8> {
    let id = engine.registry().get(&TypeKey::of::<T>()).unwrap().id();
    let mut out = Writer::new();
    out.u8(graphpack::Tag::Object.into());
    out.var_u32(id);
    token(&mut out);
    out.flush()
}

#[test]
fn value_tokens_round_trip() {
    let engine = engine();
    let cases = [
        Value::obj(Uuid::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210)),
        Value::obj(Uuid::nil()),
        Value::obj(Regex::new(r"^\d{3}-[a-z]+$").unwrap()),
        Value::obj(UNIX_EPOCH + Duration::new(1_700_000_000, 123_456_789)),
        Value::obj(UNIX_EPOCH - Duration::new(5, 1)),
        Value::obj("192.168.0.1".parse::<IpAddr>().unwrap()),
        Value::obj("2001:db8::ff00:42:8329".parse::<IpAddr>().unwrap()),
        Value::obj(Url::parse("https://example.com/a%20b?q=1#top").unwrap()),
        Value::obj(Url::parse("mailto:someone@example.org").unwrap()),
    ];
    for value in cases {
        assert_eq!(round_trip(&engine, &value), value);
        assert!(engine.copy(&value).unwrap().same(&value));
    }
}

#[test]
fn decoded_regex_still_matches() {
    let engine = engine();
    let decoded = round_trip(&engine, &Value::obj(Regex::new(r"^a+b$").unwrap()));
    let regex = decoded.downcast_ref::<Regex>().unwrap();
    assert!(regex.is_match("aaab"));
    assert!(!regex.is_match("ba"));
}

#[test]
fn catalog_tokens_keep_identity() {
    let engine = engine();
    let cases = [
        Currency::get_instance("EUR").unwrap(),
        Currency::get_instance("KWD").unwrap(),
        TimeZone::utc(),
        TimeZone::for_id("Europe/Paris").unwrap(),
        UnicodeBlock::of('カ').unwrap(),
        UnicodeBlock::of('A').unwrap(),
        Locale::new("fr", "CA", ""),
        Color::Green.canonical(),
        Obj::canonical(encoding_rs::UTF_8),
        Obj::canonical(encoding_rs::SHIFT_JIS),
    ];
    for obj in cases {
        let value = Value::Obj(obj.clone());
        let decoded = round_trip(&engine, &value);
        assert!(decoded.as_obj().unwrap().ptr_eq(&obj), "{}", obj.type_name());
        assert!(engine.copy(&value).unwrap().same(&value));
    }
}

#[test]
fn custom_zone_round_trips_by_value() {
    let engine = engine();
    let zone = TimeZone::for_id("GMT-03:30").unwrap();
    let decoded = round_trip(&engine, &Value::Obj(zone.clone()));
    let decoded = decoded.downcast_ref::<TimeZone>().unwrap();
    assert_eq!(decoded.id(), "GMT-03:30");
    assert_eq!(decoded.offset_minutes(), -210);
}

#[test]
fn locale_with_variant() {
    let engine = engine();
    let locale = Locale::new("de", "at", "POSIX");
    let decoded = round_trip(&engine, &Value::Obj(locale.clone()));
    let decoded_locale = decoded.downcast_ref::<Locale>().unwrap();
    assert_eq!(decoded_locale.country(), "AT");
    assert_eq!(decoded_locale.variant(), "POSIX");
    assert!(decoded.as_obj().unwrap().ptr_eq(&locale));
}

#[test]
fn unknown_catalog_tokens_decode_to_null() {
    let engine = engine();
    let currency = record::<Currency>(&engine, |out| out.str_opt(Some("ZZZ")));
    let zone = record::<TimeZone>(&engine, |out| out.str("Nowhere/Atlantis"));
    let block = record::<UnicodeBlock>(&engine, |out| out.str("TENGWAR"));
    let charset = record::<Encoding>(&engine, |out| out.str("x-tengwar"));
    for bytes in [currency, zone, block, charset] {
        assert_eq!(engine.decode(&bytes).unwrap(), Value::Null);
    }
}

#[test]
fn charset_is_written_by_its_canonical_name() {
    let engine = engine();
    let utf16 = Value::Obj(Obj::canonical(encoding_rs::UTF_16LE));
    let bytes = engine.encode_typed(&utf16, &TypeKey::of::<Encoding>()).unwrap();
    // tag, then the name
    assert_eq!(&bytes[1..], b"\x08UTF-16LE");

    let label = record::<Encoding>(&engine, |out| out.str("  Shift_JIS "));
    let decoded = engine.decode(&label).unwrap();
    assert!(decoded.as_obj().unwrap().ptr_eq(&Obj::canonical(encoding_rs::SHIFT_JIS)));
}

#[test]
fn malformed_uri_is_an_error() {
    let engine = engine();
    let bytes = record::<Url>(&engine, |out| out.str("not a uri"));
    assert!(matches!(
        engine.decode(&bytes).unwrap_err(),
        GraphError::InvalidRecord { kind: "uri", .. }
    ));
}

#[test]
fn unknown_enum_constant_is_an_error() {
    let engine = engine();
    let bytes = record::<Color>(&engine, |out| out.str("Purple"));
    assert!(matches!(
        engine.decode(&bytes).unwrap_err(),
        GraphError::UnknownEnumConstant { ty, constant } if ty.ends_with("Color") && constant == "Purple"
    ));
}

#[test]
fn enum_name_adapter_serves_one_type() {
    let adapter = EnumNameAdapter::<Color>::default();
    assert_eq!(adapter.name(), "enum");
    assert!(adapter.is_immutable());
}

#[test]
fn currency_accepts_null_when_typed() {
    let engine = engine();
    let ty = TypeKey::of::<Currency>();
    let bytes = engine.encode_typed(&Value::Null, &ty).unwrap();
    assert_eq!(bytes, vec![0]);
    assert_eq!(engine.decode_typed(&bytes, &ty).unwrap(), Value::Null);

    let usd = Value::Obj(Currency::get_instance("USD").unwrap());
    let bytes = engine.encode_typed(&usd, &ty).unwrap();
    assert_eq!(bytes, b"\x04USD");
    assert!(engine.decode_typed(&bytes, &ty).unwrap().same(&usd));
}

#[test]
fn comparator_singletons() {
    let engine = engine();
    for obj in [NaturalOrder::instance(), ReverseOrder::natural()] {
        let value = Value::Obj(obj.clone());
        let bytes = engine.encode(&value).unwrap();
        // tag and class id only
        assert_eq!(bytes.len(), 2);
        assert!(engine.decode(&bytes).unwrap().as_obj().unwrap().ptr_eq(&obj));
    }
}

#[test]
fn reverse_order_wraps_its_inner_comparator() {
    let engine = engine();
    let reversed = ReverseOrder::of(Some(NaturalOrder::instance())).unwrap();
    let decoded = round_trip(&engine, &Value::Obj(reversed.clone()));
    let inner = decoded.downcast_ref::<ReverseOrder>().unwrap().inner();
    assert!(inner.ptr_eq(&NaturalOrder::instance()));
    assert_eq!(decoded, Value::Obj(reversed));
}

#[test]
fn proxy_round_trip() {
    let engine = engine();
    let handler = Obj::new(Echo {
        greeting: "hello".to_string(),
    });
    let proxy = Value::Obj(Proxy::new(vec![GREETER], handler.clone()).unwrap());

    for result in [round_trip(&engine, &proxy), engine.copy(&proxy).unwrap()] {
        let decoded = result.downcast_ref::<Proxy>().unwrap();
        assert_eq!(decoded.interfaces(), &[GREETER]);
        assert!(!decoded.handler().ptr_eq(&handler));
        assert_eq!(
            decoded.invoke("Greeter", "greet", &[]).unwrap(),
            Value::from("hello from greet")
        );
    }
}

#[test]
fn proxy_with_undeclared_interface() {
    let writer = engine();
    let reader = Engine::new(registry(), EngineConfig::default()).unwrap();
    let handler = Obj::new(Echo {
        greeting: "hi".to_string(),
    });
    let proxy = Value::Obj(Proxy::new(vec![GREETER], handler).unwrap());
    let bytes = writer.encode(&proxy).unwrap();
    assert_eq!(
        reader.decode(&bytes).unwrap_err(),
        GraphError::ClassNotFound("Greeter".to_string())
    );
}

#[test]
fn system_time_rejects_overlong_nanos() {
    let engine = engine();
    let bytes = record::<SystemTime>(&engine, |out| {
        out.var_i64(0);
        out.var_u32(1_000_000_000);
    });
    assert!(matches!(
        engine.decode(&bytes).unwrap_err(),
        GraphError::InvalidRecord { kind: "system-time", .. }
    ));
}
