//! Adapters that reach private state through field handles.

use std::cell::RefCell;

use graphpack::adapters::reflective::{Wrapper, WrapperAdapter};
use graphpack::{collection_of, downcast_obj, list_of, map_of, Engine, FieldHandle, GraphError};
use graphpack_runtime::{
    sub_list, ArrayList, BoundedMap, Calendar, Field, FieldDescriptor, FixedSizeList, HashMap,
    HashSet, Introspect, LinkedList, Obj, Object, RandomAccessSubList, RuntimeError, SubList,
    Synchronized, TimeZone, TreeMap, TreeSet, Unmodifiable, Value, WrapperKind,
};

fn round_trip(engine: &Engine, value: &Value) -> Value {
    let bytes = engine.encode(value).unwrap();
    engine.decode(&bytes).unwrap()
}

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

fn pair(a: Obj, b: Obj) -> Value {
    Value::obj(vec![Value::Obj(a), Value::Obj(b)].into_iter().collect::<ArrayList>())
}

fn items_of(value: &Value) -> Vec<Value> {
    collection_of(value.as_obj().unwrap()).unwrap().to_vec()
}

// ---------------------------------------------------------------------------
// Bounded map
// ---------------------------------------------------------------------------

#[test]
fn bounded_map_keeps_its_capacity() {
    let engine = Engine::with_defaults().unwrap();
    let map = BoundedMap::new(5);
    graphpack_runtime::Map::put(&map, Value::from("a"), Value::from(1)).unwrap();
    let value = Value::obj(map);

    for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
        assert_eq!(result, value);
        let decoded = map_of(result.as_obj().unwrap()).unwrap();
        for i in 0..4 {
            decoded.put(Value::from(i), Value::Null).unwrap();
        }
        assert_eq!(
            decoded.put(Value::from("overflow"), Value::Null),
            Err(RuntimeError::CapacityExceeded { capacity: 5 })
        );
    }
}

#[test]
fn bounded_map_with_different_capacity_is_not_equal() {
    let engine = Engine::with_defaults().unwrap();
    let decoded = round_trip(&engine, &Value::obj(BoundedMap::new(3)));
    assert_ne!(decoded, Value::obj(BoundedMap::new(4)));
    assert_eq!(decoded, Value::obj(BoundedMap::new(3)));
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn calendar(zone: Obj) -> Calendar {
    let calendar = Calendar::new(zone).unwrap();
    calendar.set_time_millis(1_234_567_890_123);
    calendar.set_lenient(false);
    calendar.set_first_day_of_week(2);
    calendar.set_minimal_days_in_first_week(4);
    calendar
}

fn assert_same_settings(a: &Calendar, b: &Calendar) {
    assert_eq!(a.time_millis(), b.time_millis());
    assert_eq!(a.is_lenient(), b.is_lenient());
    assert_eq!(a.first_day_of_week(), b.first_day_of_week());
    assert_eq!(a.minimal_days_in_first_week(), b.minimal_days_in_first_week());
    assert_eq!(a.zone(), b.zone());
}

#[test]
fn calendar_matrix() {
    let engine = Engine::with_defaults().unwrap();
    for id in ["UTC", "Asia/Tokyo", "America/New_York", "GMT+05:30", "GMT-11:00"] {
        let original = Value::obj(calendar(TimeZone::for_id(id).unwrap()));
        for result in [round_trip(&engine, &original), engine.copy(&original).unwrap()] {
            let decoded = downcast_obj::<Calendar>(result.as_obj().unwrap()).unwrap();
            assert_same_settings(decoded, original.downcast_ref::<Calendar>().unwrap());
            assert_eq!(decoded.zone().unwrap().id(), id);
        }
    }
}

#[test]
fn catalog_zone_stays_canonical() {
    let engine = Engine::with_defaults().unwrap();
    let zone = FieldHandle::<Calendar, RefCell<Obj>>::resolve("zone").unwrap();
    let decoded = round_trip(&engine, &Value::obj(calendar(TimeZone::utc())));
    let decoded = downcast_obj::<Calendar>(decoded.as_obj().unwrap()).unwrap();
    assert!(zone.get(decoded).borrow().ptr_eq(&TimeZone::utc()));
}

#[test]
fn custom_zone_offset_survives() {
    let engine = Engine::with_defaults().unwrap();
    let original = Value::obj(calendar(TimeZone::for_id("GMT+05:30").unwrap()));
    let decoded = round_trip(&engine, &original);
    let zone = decoded.downcast_ref::<Calendar>().unwrap().zone().unwrap();
    assert_eq!(zone.offset_minutes(), 330);
}

// ---------------------------------------------------------------------------
// Wrappers
// ---------------------------------------------------------------------------

fn delegates() -> Vec<(WrapperKind, Obj)> {
    let list: ArrayList = ints(&[1, 2]).into_iter().collect();
    let linked: LinkedList = ints(&[3]).into_iter().collect();
    let set: HashSet = ints(&[4]).into_iter().collect();
    let sorted = TreeSet::new();
    sorted.insert(Value::from(5));
    let map: HashMap = [(Value::from("k"), Value::from(6))].into_iter().collect();
    let sorted_map = TreeMap::new();
    sorted_map.insert(Value::from("k"), Value::from(7));
    vec![
        (WrapperKind::Collection, Obj::new(HashSet::new())),
        (WrapperKind::List, Obj::new(linked)),
        (WrapperKind::RandomAccessList, Obj::new(list)),
        (WrapperKind::Set, Obj::new(set)),
        (WrapperKind::SortedSet, Obj::new(sorted)),
        (WrapperKind::Map, Obj::new(map)),
        (WrapperKind::SortedMap, Obj::new(sorted_map)),
    ]
}

#[test]
fn synchronized_wrappers_keep_their_kind() {
    let engine = Engine::with_defaults().unwrap();
    for (kind, delegate) in delegates() {
        let wrapper = Value::Obj(Synchronized::wrap(kind, delegate).unwrap());
        for result in [round_trip(&engine, &wrapper), engine.copy(&wrapper).unwrap()] {
            let decoded = downcast_obj::<Synchronized>(result.as_obj().unwrap()).unwrap();
            assert_eq!(decoded.kind(), kind);
            assert_eq!(result, wrapper, "{kind:?}");
        }
    }
}

#[test]
fn unmodifiable_wrappers_keep_their_kind() {
    let engine = Engine::with_defaults().unwrap();
    for (kind, delegate) in delegates() {
        let wrapper = Value::Obj(Unmodifiable::wrap(kind, delegate).unwrap());
        let decoded = round_trip(&engine, &wrapper);
        assert_eq!(downcast_obj::<Unmodifiable>(decoded.as_obj().unwrap()).unwrap().kind(), kind);
        assert_eq!(decoded, wrapper, "{kind:?}");
    }
}

#[test]
fn decoded_unmodifiable_list_rejects_writes() {
    let engine = Engine::with_defaults().unwrap();
    let list = Obj::new(ints(&[1, 2, 3]).into_iter().collect::<ArrayList>());
    let wrapper = Value::Obj(Unmodifiable::list(list).unwrap());
    for result in [round_trip(&engine, &wrapper), engine.copy(&wrapper).unwrap()] {
        let decoded = list_of(result.as_obj().unwrap()).unwrap();
        assert!(matches!(
            decoded.add(Value::from(4)),
            Err(RuntimeError::UnsupportedOperation(_))
        ));
        assert_eq!(decoded.get(2), Some(Value::from(3)));
    }
}

#[test]
fn wrapper_reachable_from_its_own_delegate() {
    let engine = Engine::with_defaults().unwrap();
    let delegate = Obj::new(ArrayList::new());
    let wrapper = Synchronized::list(delegate.clone()).unwrap();
    delegate
        .downcast_ref::<ArrayList>()
        .unwrap()
        .push(Value::Obj(wrapper.clone()));
    let value = Value::Obj(wrapper);

    // the wrapper's slot is still reserved while its delegate is read
    let bytes = engine.encode(&value).unwrap();
    assert_eq!(
        engine.decode(&bytes).unwrap_err(),
        GraphError::UnresolvedReference(0)
    );

    // the copy wraps one copied delegate twice
    let copy = engine.copy(&value).unwrap();
    let inner = items_of(&copy);
    assert_eq!(inner.len(), 1);
    assert!(!inner[0].same(&copy));
    assert!(items_of(&inner[0])[0].same(&inner[0]));
}

#[test]
fn synchronized_copy_has_an_independent_delegate() {
    let engine = Engine::with_defaults().unwrap();
    let delegate = Obj::new(HashMap::new());
    let wrapper = Value::Obj(Synchronized::map(delegate.clone()).unwrap());
    let copy = engine.copy(&wrapper).unwrap();
    map_of(copy.as_obj().unwrap())
        .unwrap()
        .put(Value::from("only-in-copy"), Value::Null)
        .unwrap();
    assert!(map_of(&delegate).unwrap().is_empty());
    assert_eq!(map_of(copy.as_obj().unwrap()).unwrap().len(), 1);
}

#[test]
fn unknown_wrapper_discriminator() {
    let engine = Engine::with_defaults().unwrap();
    let wrapper = Synchronized::collection(Obj::new(ArrayList::new())).unwrap();
    let mut bytes = engine.encode(&Value::Obj(wrapper)).unwrap();
    // tag, class id, discriminator
    assert_eq!(bytes[2], 0);
    bytes[2] = 99;
    assert_eq!(
        engine.decode(&bytes).unwrap_err(),
        GraphError::UnknownDiscriminator {
            family: "synchronized",
            index: 99,
        }
    );
}

#[derive(Debug)]
struct Hidden {
    kind: WrapperKind,
    inner: Obj,
}

impl Object for Hidden {}

impl Introspect for Hidden {
    fn fields() -> &'static [FieldDescriptor] {
        static INNER: Field<Hidden, Obj> = Field::new("inner", |h| &h.inner);
        static FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("inner", &INNER)];
        &FIELDS
    }
}

impl Wrapper for Hidden {
    const NAME: &'static str = "hidden";

    fn wrapper_kind(&self) -> WrapperKind {
        self.kind
    }

    fn rewrap(kind: WrapperKind, delegate: Obj) -> Result<Obj, RuntimeError> {
        Ok(Obj::new(Hidden {
            kind,
            inner: delegate,
        }))
    }
}

#[derive(Debug)]
struct Mistyped {
    kind: WrapperKind,
    delegate: String,
}

impl Object for Mistyped {}

impl Introspect for Mistyped {
    fn fields() -> &'static [FieldDescriptor] {
        static DELEGATE: Field<Mistyped, String> = Field::new("delegate", |m| &m.delegate);
        static FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new("delegate", &DELEGATE)];
        &FIELDS
    }
}

impl Wrapper for Mistyped {
    const NAME: &'static str = "mistyped";

    fn wrapper_kind(&self) -> WrapperKind {
        self.kind
    }

    fn rewrap(kind: WrapperKind, _delegate: Obj) -> Result<Obj, RuntimeError> {
        Ok(Obj::new(Mistyped {
            kind,
            delegate: String::new(),
        }))
    }
}

#[test]
fn missing_delegate_field_fails_at_construction() {
    let err = WrapperAdapter::<Hidden>::try_new().err().unwrap();
    assert!(matches!(
        err,
        GraphError::FieldNotFound { owner, field: "delegate" } if owner.ends_with("Hidden")
    ));
}

#[test]
fn mistyped_delegate_field_fails_at_construction() {
    let err = WrapperAdapter::<Mistyped>::try_new().err().unwrap();
    assert!(matches!(
        err,
        GraphError::FieldTypeMismatch { field: "delegate", expected, .. } if expected.ends_with("Obj")
    ));
}

// ---------------------------------------------------------------------------
// Views over other lists
// ---------------------------------------------------------------------------

#[test]
fn sub_list_shares_decoded_parent() {
    let engine = Engine::with_defaults().unwrap();
    let list = Obj::new(ints(&[1, 2, 3, 4, 5]).into_iter().collect::<ArrayList>());
    let view = sub_list(&list, 1, 4).unwrap();
    let value = pair(list.clone(), view);

    for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
        let items = items_of(&result);
        let decoded_list = items[0].as_obj().unwrap();
        let decoded_view = items[1].as_obj().unwrap();
        assert!(decoded_view.is::<RandomAccessSubList>());
        assert_eq!(list_of(decoded_view).unwrap().to_vec(), ints(&[2, 3, 4]));

        list_of(decoded_view).unwrap().set(0, Value::from(20)).unwrap();
        assert_eq!(list_of(decoded_list).unwrap().get(1), Some(Value::from(20)));
    }
    assert_eq!(list_of(&list).unwrap().get(1), Some(Value::from(2)));
}

#[test]
fn sub_list_written_alone_brings_its_parent() {
    let engine = Engine::with_defaults().unwrap();
    let list = Obj::new(ints(&[1, 2, 3]).into_iter().collect::<LinkedList>());
    let view = Value::Obj(sub_list(&list, 0, 2).unwrap());
    let decoded = round_trip(&engine, &view);
    let decoded = decoded.as_obj().unwrap();
    assert!(decoded.is::<SubList>());
    assert_eq!(list_of(decoded).unwrap().to_vec(), ints(&[1, 2]));
}

#[test]
fn view_inside_its_own_parent() {
    let engine = Engine::with_defaults().unwrap();
    let list = Obj::new(ints(&[1, 2, 3]).into_iter().collect::<ArrayList>());
    let view = sub_list(&list, 0, 2).unwrap();
    list.downcast_ref::<ArrayList>().unwrap().push(Value::Obj(view.clone()));

    // The parent is created before its elements, so the view can point back.
    let decoded = round_trip(&engine, &Value::Obj(list.clone()));
    let items = items_of(&decoded);
    let inner = items[3].as_obj().unwrap();
    let parent = FieldHandle::<RandomAccessSubList, Obj>::resolve("parent").unwrap();
    assert!(parent
        .get(downcast_obj::<RandomAccessSubList>(inner).unwrap())
        .ptr_eq(decoded.as_obj().unwrap()));

    // Written view first, the parent refers back to a view that does not
    // exist yet.
    let bytes = engine.encode(&Value::Obj(view)).unwrap();
    assert_eq!(engine.decode(&bytes).unwrap_err(), GraphError::UnresolvedReference(0));
}

#[test]
fn fixed_size_list_round_trip() {
    let engine = Engine::with_defaults().unwrap();
    for values in [vec![], ints(&[1]), ints(&[1, 2, 3, 4, 5])] {
        let value = Value::obj(FixedSizeList::from_array(values.clone()));
        for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
            let decoded = list_of(result.as_obj().unwrap()).unwrap();
            assert_eq!(decoded.to_vec(), values);
            assert!(decoded.add(Value::Null).is_err());
        }
    }
}

#[test]
fn fixed_size_list_containing_itself() {
    let engine = Engine::with_defaults().unwrap();
    let list = Obj::new(FixedSizeList::from_array(vec![Value::Null, Value::from(1)]));
    list_of(&list).unwrap().set(0, Value::Obj(list.clone())).unwrap();
    let value = Value::Obj(list);
    for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
        let decoded = result.as_obj().unwrap();
        let first = list_of(decoded).unwrap().get(0).unwrap();
        assert!(first.as_obj().unwrap().ptr_eq(decoded));
        assert_eq!(list_of(decoded).unwrap().get(1), Some(Value::from(1)));
    }
}
