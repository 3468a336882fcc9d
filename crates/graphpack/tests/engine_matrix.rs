//! Engine-level behavior: tags, references, limits, registration.

use graphpack::adapters;
use graphpack::{
    collection_of, Adapter, Engine, EngineConfig, GraphError, ReadContext, Registry, TypeKey,
    WriteContext,
};
use graphpack_buffers::BufferError;
use graphpack_runtime::{ArrayList, HashMap, LinkedList, Obj, Object, Value};
use proptest::prelude::*;

fn engine_with(config: EngineConfig) -> Engine {
    let mut registry = Registry::new();
    adapters::register_defaults(&mut registry).unwrap();
    Engine::new(registry, config).unwrap()
}

fn list_of(items: Vec<Value>) -> Obj {
    Obj::new(items.into_iter().collect::<ArrayList>())
}

fn nested(depth: usize) -> Value {
    let mut value = Value::from(0);
    for _ in 0..depth {
        value = Value::Obj(list_of(vec![value]));
    }
    value
}

fn self_containing() -> Obj {
    let list = list_of(vec![Value::from("head")]);
    list.downcast_ref::<ArrayList>().unwrap().push(Value::Obj(list.clone()));
    list
}

#[test]
fn self_referential_list_round_trip() {
    let engine = Engine::with_defaults().unwrap();
    let bytes = engine.encode(&Value::Obj(self_containing())).unwrap();
    let decoded = engine.decode(&bytes).unwrap();
    let decoded = decoded.as_obj().unwrap();
    let items = collection_of(decoded).unwrap().to_vec();
    assert_eq!(items[0], Value::from("head"));
    assert!(items[1].as_obj().unwrap().ptr_eq(decoded));
}

#[test]
fn diamond_sharing_survives_round_trip_and_copy() {
    let engine = Engine::with_defaults().unwrap();
    let shared = Value::Obj(list_of(vec![Value::from(1)]));
    let map: HashMap = [
        (Value::from("left"), shared.clone()),
        (Value::from("right"), shared),
    ]
    .into_iter()
    .collect();
    let value = Value::obj(map);
    let bytes = engine.encode(&value).unwrap();
    for result in [engine.decode(&bytes).unwrap(), engine.copy(&value).unwrap()] {
        let map = result.as_obj().unwrap().get().as_map().unwrap();
        let left = map.get(&Value::from("left")).unwrap();
        let right = map.get(&Value::from("right")).unwrap();
        assert!(left.same(&right));
    }
}

#[test]
fn copy_without_reference_tracking_splits_shared_objects() {
    let engine = engine_with(EngineConfig {
        copy_references: false,
        ..EngineConfig::default()
    });
    let shared = Value::Obj(list_of(vec![]));
    let pair = Value::Obj(list_of(vec![shared.clone(), shared]));
    let copy = engine.copy(&pair).unwrap();
    let items = collection_of(copy.as_obj().unwrap()).unwrap().to_vec();
    assert!(!items[0].same(&items[1]));
    assert_eq!(items[0], items[1]);
}

#[test]
fn truncated_input() {
    let engine = Engine::with_defaults().unwrap();
    let value = Value::Obj(list_of(vec![Value::from("abc")]));
    let bytes = engine.encode(&value).unwrap();
    for cut in 1..bytes.len() {
        let err = engine.decode(&bytes[..cut]).unwrap_err();
        assert!(
            matches!(
                err,
                GraphError::Buffer(BufferError::EndOfBuffer) | GraphError::InvalidRecord { .. }
            ),
            "cut at {cut}: {err:?}"
        );
    }
    assert_eq!(
        engine.decode(&bytes[..bytes.len() - 1]).unwrap_err(),
        GraphError::Buffer(BufferError::EndOfBuffer)
    );
    assert_eq!(engine.decode(&[]).unwrap_err(), GraphError::Buffer(BufferError::EndOfBuffer));
}

#[test]
fn oversized_length_is_rejected_before_allocating() {
    let engine = Engine::with_defaults().unwrap();
    let mut bytes = engine.encode(&Value::Obj(list_of(vec![]))).unwrap();
    // Replace the empty length with u32::MAX.
    bytes.pop();
    bytes.extend_from_slice(&[0xff, 0xff, 0xff, 0xff, 0x0f]);
    assert!(matches!(
        engine.decode(&bytes).unwrap_err(),
        GraphError::InvalidRecord { kind: "array-list", .. }
    ));
}

#[test]
fn trailing_bytes() {
    let engine = Engine::with_defaults().unwrap();
    let mut bytes = engine.encode(&Value::Obj(list_of(vec![Value::Null]))).unwrap();
    bytes.extend_from_slice(&[0, 0]);
    assert_eq!(engine.decode(&bytes).unwrap_err(), GraphError::TrailingBytes(2));
}

#[test]
fn depth_limit_applies_to_every_walk() {
    let strict = engine_with(EngineConfig {
        max_depth: 5,
        ..EngineConfig::default()
    });
    let permissive = Engine::with_defaults().unwrap();

    let fits = nested(5);
    assert_eq!(strict.decode(&strict.encode(&fits).unwrap()).unwrap(), fits);

    let deep = nested(6);
    assert_eq!(strict.encode(&deep).unwrap_err(), GraphError::DepthExceeded(5));
    assert_eq!(strict.copy(&deep).unwrap_err(), GraphError::DepthExceeded(5));
    let bytes = permissive.encode(&deep).unwrap();
    assert_eq!(strict.decode(&bytes).unwrap_err(), GraphError::DepthExceeded(5));
}

#[test]
fn cycles_without_references_hit_the_depth_limit() {
    let engine = engine_with(EngineConfig {
        references: false,
        copy_references: false,
        max_depth: 64,
    });
    let cycle = Value::Obj(self_containing());
    assert_eq!(engine.encode(&cycle).unwrap_err(), GraphError::DepthExceeded(64));
    assert_eq!(engine.copy(&cycle).unwrap_err(), GraphError::DepthExceeded(64));
}

#[test]
fn back_references_need_reference_tracking() {
    let engine = engine_with(EngineConfig {
        references: false,
        ..EngineConfig::default()
    });
    assert_eq!(engine.decode(&[7, 0]).unwrap_err(), GraphError::InvalidReference(0));
}

#[test]
fn typed_encoding_omits_the_class_id() {
    let engine = Engine::with_defaults().unwrap();
    let ty = TypeKey::of::<LinkedList>();
    let list = Value::obj(LinkedList::from_iter([Value::from(1)]));

    let typed = engine.encode_typed(&list, &ty).unwrap();
    let tagged = engine.encode(&list).unwrap();
    assert_eq!(typed.len() + 1, tagged.len());
    assert_eq!(engine.decode_typed(&typed, &ty).unwrap(), list);

    assert_eq!(engine.encode_typed(&Value::Null, &ty).unwrap(), vec![0]);
    assert_eq!(engine.decode_typed(&[0], &ty).unwrap(), Value::Null);
}

#[test]
fn typed_encoding_checks_the_type() {
    let engine = Engine::with_defaults().unwrap();
    let ty = TypeKey::of::<LinkedList>();
    let err = engine.encode_typed(&Value::obj(ArrayList::new()), &ty).unwrap_err();
    assert!(matches!(err, GraphError::UnexpectedType { expected, .. } if expected.ends_with("LinkedList")));
    let err = engine.encode_typed(&Value::from(3), &ty).unwrap_err();
    assert!(matches!(err, GraphError::UnexpectedType { found: "int", .. }));
}

#[derive(Debug)]
struct Point {
    x: i64,
    y: i64,
}

impl Object for Point {}

struct PointAdapter;

impl Adapter for PointAdapter {
    fn name(&self) -> &'static str {
        "point"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> graphpack::Result<()> {
        let point = graphpack::downcast::<Point>(value)?;
        ctx.output().var_i64(point.x);
        ctx.output().var_i64(point.y);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> graphpack::Result<Value> {
        let x = ctx.input().var_i64()?;
        let y = ctx.input().var_i64()?;
        Ok(Value::obj(Point { x, y }))
    }
}

#[test]
fn unregistered_types() {
    let engine = Engine::with_defaults().unwrap();
    let point = Value::obj(Point { x: 1, y: 2 });
    assert!(matches!(
        engine.encode(&point).unwrap_err(),
        GraphError::UnregisteredType(name) if name.ends_with("Point")
    ));
    assert!(matches!(engine.copy(&point).unwrap_err(), GraphError::UnregisteredType(_)));

    let unknown_id = engine.registry().len() as u8;
    assert_eq!(
        engine.decode(&[6, unknown_id]).unwrap_err(),
        GraphError::UnknownTypeId(u32::from(unknown_id))
    );
}

#[test]
fn user_adapters_join_the_registry() {
    let mut registry = Registry::new();
    adapters::register_defaults(&mut registry).unwrap();
    let id = registry.register::<Point>(PointAdapter).unwrap();
    assert_eq!(id as usize, registry.len() - 1);
    assert!(matches!(
        registry.register::<Point>(PointAdapter).unwrap_err(),
        GraphError::DuplicateRegistration(_)
    ));

    let engine = Engine::new(registry, EngineConfig::default()).unwrap();
    let points = Value::Obj(list_of(vec![
        Value::obj(Point { x: -3, y: 9 }),
        Value::obj(Point { x: 0, y: 1 << 40 }),
    ]));
    let decoded = engine.decode(&engine.encode(&points).unwrap()).unwrap();
    let items = collection_of(decoded.as_obj().unwrap()).unwrap().to_vec();
    let first = items[0].downcast_ref::<Point>().unwrap();
    assert_eq!((first.x, first.y), (-3, 9));
    assert_eq!(items[1].downcast_ref::<Point>().unwrap().y, 1 << 40);

    // No duplicate hook and not immutable: copying is refused.
    assert_eq!(engine.copy(&points).unwrap_err(), GraphError::CopyUnsupported("point"));
}

#[test]
fn class_ids_follow_registration_order() {
    let a = Engine::with_defaults().unwrap();
    let b = Engine::with_defaults().unwrap();
    let ids = |engine: &Engine| engine.registry().iter().map(|r| (r.id(), *r.key())).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
    for (index, registration) in a.registry().iter().enumerate() {
        assert_eq!(registration.id() as usize, index);
    }
}

#[test]
fn resolve_name_finds_registered_types() {
    let engine = Engine::with_defaults().unwrap();
    let key = TypeKey::of::<ArrayList>();
    assert_eq!(engine.registry().resolve_name(key.name()).unwrap(), key);
    assert_eq!(
        engine.registry().resolve_name("no::such::Type").unwrap_err(),
        GraphError::ClassNotFound("no::such::Type".to_string())
    );
}

#[test]
fn config_from_json() {
    let config = EngineConfig::from_json(r#"{ "max_depth": 16, "copy_references": false }"#).unwrap();
    assert_eq!(
        config,
        EngineConfig {
            references: true,
            max_depth: 16,
            copy_references: false,
        }
    );
    assert!(matches!(EngineConfig::from_json("not json"), Err(GraphError::Config(_))));
    assert!(matches!(
        Engine::new(Registry::new(), EngineConfig { max_depth: 0, ..config }),
        Err(GraphError::Config(_))
    ));
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        ".{0,24}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn scalars_round_trip(value in scalar()) {
        let engine = Engine::with_defaults().unwrap();
        let bytes = engine.encode(&value).unwrap();
        prop_assert_eq!(engine.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn scalar_lists_round_trip(items in prop::collection::vec(scalar(), 0..16)) {
        let engine = Engine::with_defaults().unwrap();
        let value = Value::Obj(list_of(items));
        let bytes = engine.encode(&value).unwrap();
        prop_assert_eq!(engine.decode(&bytes).unwrap(), value.clone());
        prop_assert_eq!(engine.copy(&value).unwrap(), value);
    }
}
