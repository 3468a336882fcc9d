//! Round trips and deep copies for the structural-rebuild adapters.

use std::cmp::Ordering;

use graphpack::{collection_of, downcast_obj, map_of, Adapter, Engine, EngineConfig, GraphError};
use graphpack::{ReadContext, Registry, TypeKey, WriteContext};
use graphpack::adapters::{self, tokens::SingletonAdapter};
use graphpack_runtime::enums::{all_of, enum_set_of, none_of};
use graphpack_runtime::{
    enum_constants, ArrayList, Comparator, EnumMap, EnumType, HashMap, HashSet, ImmutableList,
    ImmutableMap, ImmutableSet, ImmutableSortedMap, ImmutableSortedSet, JumboEnumSet,
    LinkedHashMap, LinkedHashSet, LinkedList, Multimap, MultimapKind, Obj, Object, RegularEnumSet,
    ReverseOrder, Table, TableKind, TreeMap, TreeSet, Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
}
enum_constants!(Planet { Mercury, Venus, Earth, Mars });

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Big {
    B00, B01, B02, B03, B04, B05, B06, B07, B08, B09,
    B10, B11, B12, B13, B14, B15, B16, B17, B18, B19,
    B20, B21, B22, B23, B24, B25, B26, B27, B28, B29,
    B30, B31, B32, B33, B34, B35, B36, B37, B38, B39,
    B40, B41, B42, B43, B44, B45, B46, B47, B48, B49,
    B50, B51, B52, B53, B54, B55, B56, B57, B58, B59,
    B60, B61, B62, B63, B64, B65, B66, B67, B68, B69,
}
enum_constants!(Big {
    B00, B01, B02, B03, B04, B05, B06, B07, B08, B09,
    B10, B11, B12, B13, B14, B15, B16, B17, B18, B19,
    B20, B21, B22, B23, B24, B25, B26, B27, B28, B29,
    B30, B31, B32, B33, B34, B35, B36, B37, B38, B39,
    B40, B41, B42, B43, B44, B45, B46, B47, B48, B49,
    B50, B51, B52, B53, B54, B55, B56, B57, B58, B59,
    B60, B61, B62, B63, B64, B65, B66, B67, B68, B69,
});

#[derive(Debug)]
struct Person {
    name: String,
    age: i64,
}

impl Object for Person {}

struct PersonAdapter;

impl Adapter for PersonAdapter {
    fn name(&self) -> &'static str {
        "person"
    }

    fn encode(&self, ctx: &mut WriteContext<'_>, value: &Value) -> graphpack::Result<()> {
        let person = graphpack::downcast::<Person>(value)?;
        ctx.output().str(&person.name);
        ctx.output().var_i64(person.age);
        Ok(())
    }

    fn decode(&self, ctx: &mut ReadContext<'_, '_>, _ty: &TypeKey) -> graphpack::Result<Value> {
        let name = ctx.input().str()?.to_string();
        let age = ctx.input().var_i64()?;
        Ok(Value::obj(Person { name, age }))
    }

    fn is_immutable(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct ByAge;

impl Object for ByAge {
    fn as_comparator(&self) -> Option<&dyn Comparator> {
        Some(self)
    }
}

impl Comparator for ByAge {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let age = |v: &Value| v.downcast_ref::<Person>().map(|p| p.age);
        age(a).cmp(&age(b))
    }
}

fn engine() -> Engine {
    let mut registry = Registry::new();
    adapters::register_defaults(&mut registry).unwrap();
    registry.register_enum::<Planet>().unwrap();
    registry.register_enum::<Big>().unwrap();
    registry.register::<Person>(PersonAdapter).unwrap();
    registry
        .register::<ByAge>(SingletonAdapter::new("by-age", || Obj::new(ByAge)))
        .unwrap();
    Engine::new(registry, EngineConfig::default()).unwrap()
}

fn round_trip(engine: &Engine, value: &Value) -> Value {
    let bytes = engine.encode(value).unwrap();
    engine.decode(&bytes).unwrap()
}

fn items(n: usize) -> Vec<Value> {
    (0..n).map(|i| Value::from(format!("item-{i}"))).collect()
}

fn person(name: &str, age: i64) -> Value {
    Value::obj(Person {
        name: name.to_string(),
        age,
    })
}

fn names(obj: &Obj) -> Vec<String> {
    collection_of(obj)
        .unwrap()
        .to_vec()
        .iter()
        .map(|v| v.downcast_ref::<Person>().unwrap().name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Growable collections and maps
// ---------------------------------------------------------------------------

#[test]
fn collection_defaults_matrix() {
    let engine = engine();
    let factories: [fn() -> Obj; 4] = [
        || Obj::new(ArrayList::new()),
        || Obj::new(LinkedList::new()),
        || Obj::new(HashSet::new()),
        || Obj::new(LinkedHashSet::new()),
    ];
    for create in factories {
        for n in [0, 1, 5] {
            let original = create();
            for item in items(n) {
                collection_of(&original).unwrap().add(item).unwrap();
            }
            let value = Value::Obj(original.clone());
            for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
                let obj = result.as_obj().unwrap();
                assert_eq!(obj.concrete_type_id(), original.concrete_type_id());
                assert!(!obj.ptr_eq(&original));
                assert_eq!(result, value, "{} with {n} items", original.type_name());
            }
        }
    }
}

#[test]
fn linked_collections_keep_iteration_order() {
    let engine = engine();
    let set = Obj::new(LinkedHashSet::new());
    for item in ["c", "a", "b"] {
        collection_of(&set).unwrap().add(Value::from(item)).unwrap();
    }
    let decoded = round_trip(&engine, &Value::Obj(set));
    let order = collection_of(decoded.as_obj().unwrap()).unwrap().to_vec();
    assert_eq!(order, vec![Value::from("c"), Value::from("a"), Value::from("b")]);
}

#[test]
fn map_defaults_matrix() {
    let engine = engine();
    let factories: [fn() -> Obj; 3] = [
        || Obj::new(HashMap::new()),
        || Obj::new(LinkedHashMap::new()),
        || Obj::new(TreeMap::new()),
    ];
    for create in factories {
        for n in [0, 1, 5] {
            let original = create();
            for (i, item) in items(n).into_iter().enumerate() {
                map_of(&original).unwrap().put(item, Value::from(i as i64)).unwrap();
            }
            let value = Value::Obj(original.clone());
            for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
                assert_eq!(result.as_obj().unwrap().concrete_type_id(), original.concrete_type_id());
                assert_eq!(result, value, "{} with {n} entries", original.type_name());
            }
        }
    }
}

#[test]
fn self_containing_list_copy() {
    let engine = engine();
    let list = Obj::new(ArrayList::new());
    list.downcast_ref::<ArrayList>().unwrap().push(Value::Obj(list.clone()));
    let copy = engine.copy(&Value::Obj(list.clone())).unwrap();
    let copy = copy.as_obj().unwrap();
    assert!(!copy.ptr_eq(&list));
    let inner = collection_of(copy).unwrap().to_vec();
    assert!(inner[0].as_obj().unwrap().ptr_eq(copy));
}

#[test]
fn set_holding_a_list_that_holds_the_set() {
    let engine = engine();
    for set in [Obj::new(HashSet::new()), Obj::new(LinkedHashSet::new())] {
        let list = Obj::new(ArrayList::new());
        collection_of(&set).unwrap().add(Value::Obj(list.clone())).unwrap();
        list.downcast_ref::<ArrayList>().unwrap().push(Value::Obj(set.clone()));

        let value = Value::Obj(set.clone());
        for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
            let decoded = result.as_obj().unwrap();
            assert!(!decoded.ptr_eq(&set));
            assert_eq!(decoded.concrete_type_id(), set.concrete_type_id());
            let members = collection_of(decoded).unwrap().to_vec();
            assert_eq!(members.len(), 1);
            let inner = collection_of(members[0].as_obj().unwrap()).unwrap().to_vec();
            assert_eq!(inner.len(), 1);
            assert!(inner[0].as_obj().unwrap().ptr_eq(decoded));
        }
    }
}

#[test]
fn map_keyed_by_a_list_that_holds_the_map() {
    let engine = engine();
    for map in [Obj::new(HashMap::new()), Obj::new(LinkedHashMap::new())] {
        let list = Obj::new(ArrayList::new());
        map_of(&map).unwrap().put(Value::Obj(list.clone()), Value::from(1)).unwrap();
        list.downcast_ref::<ArrayList>().unwrap().push(Value::Obj(map.clone()));

        let value = Value::Obj(map.clone());
        for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
            let decoded = result.as_obj().unwrap();
            assert!(!decoded.ptr_eq(&map));
            let entries = map_of(decoded).unwrap().entries();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].1, Value::from(1));
            let key_items = collection_of(entries[0].0.as_obj().unwrap()).unwrap().to_vec();
            assert!(key_items[0].as_obj().unwrap().ptr_eq(decoded));
        }
    }
}

// ---------------------------------------------------------------------------
// Sorted structures
// ---------------------------------------------------------------------------

#[test]
fn tree_set_orders_by_its_comparator() {
    let engine = engine();
    let by_age = Obj::new(ByAge);
    let set = Obj::new(TreeSet::with_comparator(Some(by_age.clone())).unwrap());
    collection_of(&set).unwrap().add(person("Alice", 20)).unwrap();
    collection_of(&set).unwrap().add(person("Bob", 10)).unwrap();
    assert_eq!(names(&set), ["Bob", "Alice"]);

    let copy = engine.copy(&Value::Obj(set.clone())).unwrap();
    let copy = copy.as_obj().unwrap();
    let comparator = downcast_obj::<TreeSet>(copy).unwrap().comparator().unwrap();
    assert!(comparator.ptr_eq(&by_age));
    assert_eq!(names(copy), ["Bob", "Alice"]);

    let decoded = round_trip(&engine, &Value::Obj(set));
    let decoded = decoded.as_obj().unwrap();
    assert!(downcast_obj::<TreeSet>(decoded).unwrap().comparator().unwrap().is::<ByAge>());
    assert_eq!(names(decoded), ["Bob", "Alice"]);
}

#[test]
fn tree_map_with_reverse_order() {
    let engine = engine();
    let map = Obj::new(TreeMap::with_comparator(Some(ReverseOrder::natural())).unwrap());
    for i in 0..4 {
        map_of(&map).unwrap().put(Value::from(i), Value::from("v")).unwrap();
    }
    let decoded = round_trip(&engine, &Value::Obj(map.clone()));
    let decoded = downcast_obj::<TreeMap>(decoded.as_obj().unwrap()).unwrap();
    assert!(decoded.comparator().unwrap().ptr_eq(&ReverseOrder::natural()));
    assert_eq!(decoded.first_key(), Some(Value::from(3)));

    let copy = engine.copy(&Value::Obj(map)).unwrap();
    assert!(downcast_obj::<TreeMap>(copy.as_obj().unwrap())
        .unwrap()
        .comparator()
        .unwrap()
        .ptr_eq(&ReverseOrder::natural()));
}

// ---------------------------------------------------------------------------
// Immutable collections
// ---------------------------------------------------------------------------

#[test]
fn immutable_matrix() {
    let engine = engine();
    for n in [0, 1, 5] {
        let entries: Vec<(Value, Value)> = items(n)
            .into_iter()
            .zip(0i64..)
            .map(|(k, v)| (k, Value::from(v)))
            .collect();
        let cases = [
            Value::obj(ImmutableList::copy_of(items(n))),
            Value::obj(ImmutableSet::copy_of(items(n))),
            Value::obj(ImmutableSortedSet::copy_of_sorted(None, items(n)).unwrap()),
            Value::obj(ImmutableMap::copy_of(entries.clone())),
            Value::obj(ImmutableSortedMap::copy_of_sorted(None, entries).unwrap()),
        ];
        for value in cases {
            let decoded = round_trip(&engine, &value);
            assert_eq!(decoded, value);
            assert_eq!(
                decoded.as_obj().unwrap().concrete_type_id(),
                value.as_obj().unwrap().concrete_type_id()
            );
            assert!(engine.copy(&value).unwrap().same(&value));
        }
    }
}

#[test]
fn immutable_sorted_set_keeps_comparator() {
    let engine = engine();
    let set = ImmutableSortedSet::copy_of_sorted(Some(ReverseOrder::natural()), items(3)).unwrap();
    let decoded = round_trip(&engine, &Value::obj(set));
    let decoded = decoded.as_obj().unwrap();
    assert!(downcast_obj::<ImmutableSortedSet>(decoded)
        .unwrap()
        .comparator()
        .unwrap()
        .ptr_eq(&ReverseOrder::natural()));
    assert_eq!(collection_of(decoded).unwrap().to_vec()[0], Value::from("item-2"));
}

// ---------------------------------------------------------------------------
// Multimaps and tables
// ---------------------------------------------------------------------------

fn multimaps() -> Vec<Multimap> {
    vec![
        Multimap::array_list(),
        Multimap::hash(),
        Multimap::linked_hash(),
        Multimap::tree(None, Some(ReverseOrder::natural())).unwrap(),
    ]
}

#[test]
fn multimap_duplicate_keys_survive() {
    let engine = engine();
    for multimap in multimaps() {
        let kind = multimap.kind();
        multimap.put(Value::from(1), Value::from(2));
        multimap.put(Value::from(1), Value::from(3));
        let value = Value::obj(multimap);
        for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
            let decoded = downcast_obj::<Multimap>(result.as_obj().unwrap()).unwrap();
            assert_eq!(decoded.kind(), kind);
            assert_eq!(decoded.len(), 2);
            let mut values = decoded.get(&Value::from(1));
            values.sort();
            assert_eq!(values, vec![Value::from(2), Value::from(3)]);
            assert_eq!(result, value);
        }
    }
}

#[test]
fn tree_multimap_keeps_value_comparator() {
    let engine = engine();
    let multimap = Multimap::tree(None, Some(ReverseOrder::natural())).unwrap();
    let value = Value::obj(multimap);
    let decoded = round_trip(&engine, &value);
    let decoded = downcast_obj::<Multimap>(decoded.as_obj().unwrap()).unwrap();
    assert_eq!(decoded.kind(), MultimapKind::Tree);
    assert!(decoded.key_comparator().is_none());
    assert!(decoded.value_comparator().unwrap().ptr_eq(&ReverseOrder::natural()));
}

#[test]
fn table_matrix() {
    let engine = engine();
    let tables = [
        Table::hash(),
        Table::tree(Some(ReverseOrder::natural()), None).unwrap(),
    ];
    for table in tables {
        let kind = table.kind();
        for (r, c) in [(1, "x"), (1, "y"), (2, "x")] {
            table.put(Value::from(r), Value::from(c), Value::from(format!("{r}{c}")));
        }
        let value = Value::obj(table);
        for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
            let decoded = downcast_obj::<Table>(result.as_obj().unwrap()).unwrap();
            assert_eq!(decoded.kind(), kind);
            assert_eq!(decoded.len(), 3);
            assert_eq!(
                decoded.get(&Value::from(1), &Value::from("y")),
                Some(Value::from("1y"))
            );
            if kind == TableKind::Tree {
                assert!(decoded.row_comparator().unwrap().ptr_eq(&ReverseOrder::natural()));
                assert_eq!(decoded.row_keys()[0], Value::from(2));
            }
        }
    }
}

#[test]
fn tree_multimap_and_table_copies_share_a_custom_comparator() {
    let engine = engine();
    let by_age = Obj::new(ByAge);

    let multimap = Multimap::tree(Some(by_age.clone()), None).unwrap();
    multimap.put(person("Alice", 20), Value::from(1));
    multimap.put(person("Bob", 10), Value::from(2));
    let copy = engine.copy(&Value::obj(multimap)).unwrap();
    let copy = downcast_obj::<Multimap>(copy.as_obj().unwrap()).unwrap();
    assert!(copy.key_comparator().unwrap().ptr_eq(&by_age));
    let entries = copy.entries();
    assert_eq!(entries[0].0.downcast_ref::<Person>().unwrap().name, "Bob");

    let table = Table::tree(Some(by_age.clone()), None).unwrap();
    table.put(person("Alice", 20), Value::from("c"), Value::from(1));
    table.put(person("Bob", 10), Value::from("c"), Value::from(2));
    let copy = engine.copy(&Value::obj(table)).unwrap();
    let copy = downcast_obj::<Table>(copy.as_obj().unwrap()).unwrap();
    assert!(copy.row_comparator().unwrap().ptr_eq(&by_age));
    let rows = copy.row_keys();
    assert_eq!(rows[0].downcast_ref::<Person>().unwrap().name, "Bob");
}

// ---------------------------------------------------------------------------
// Enum containers
// ---------------------------------------------------------------------------

#[test]
fn enum_sets_keep_their_representation() {
    let engine = engine();
    let big = EnumType::of::<Big>();
    let jumbo = none_of(big);
    for ordinal in [0, 33, 69] {
        let constant = big.constant(ordinal).unwrap();
        collection_of(&jumbo).unwrap().add(Value::Obj(constant)).unwrap();
    }
    let cases = [
        (none_of(EnumType::of::<Planet>()), 0),
        (enum_set_of(&[Planet::Earth]), 1),
        (enum_set_of(&[Planet::Mars, Planet::Mercury]), 2),
        (all_of(EnumType::of::<Planet>()), 4),
        (none_of(big), 0),
        (jumbo, 3),
        (all_of(big), 70),
    ];
    for (set, len) in cases {
        let value = Value::Obj(set.clone());
        for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
            let decoded = result.as_obj().unwrap();
            assert_eq!(decoded.concrete_type_id(), set.concrete_type_id());
            assert_eq!(collection_of(decoded).unwrap().len(), len);
            assert_eq!(result, value);
        }
    }
    assert!(enum_set_of(&[Planet::Venus]).is::<RegularEnumSet>());
    assert!(none_of(big).is::<JumboEnumSet>());
}

#[test]
fn decoded_enum_members_are_canonical() {
    let engine = engine();
    let decoded = round_trip(&engine, &Value::Obj(enum_set_of(&[Planet::Venus])));
    let members = collection_of(decoded.as_obj().unwrap()).unwrap().to_vec();
    assert!(members[0].as_obj().unwrap().ptr_eq(&graphpack_runtime::EnumConstant::canonical(&Planet::Venus)));
}

#[test]
fn enum_map_round_trip() {
    let engine = engine();
    for n in [0usize, 1, 3] {
        let map = EnumMap::new(EnumType::of::<Planet>());
        for (ordinal, item) in items(n).into_iter().enumerate() {
            let key = EnumType::of::<Planet>().constant(ordinal).unwrap();
            graphpack_runtime::Map::put(&map, Value::Obj(key), item).unwrap();
        }
        let value = Value::obj(map);
        for result in [round_trip(&engine, &value), engine.copy(&value).unwrap()] {
            let decoded = downcast_obj::<EnumMap>(result.as_obj().unwrap()).unwrap();
            assert_eq!(decoded.key_type(), EnumType::of::<Planet>());
            assert_eq!(result, value);
        }
    }
}

#[test]
fn unregistered_enum_type_cannot_be_written() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Stray {
        Only,
    }
    enum_constants!(Stray { Only });

    let engine = engine();
    let err = engine.encode(&Value::Obj(enum_set_of(&[Stray::Only]))).unwrap_err();
    assert!(matches!(err, GraphError::UnregisteredType(name) if name.ends_with("Stray")));
}
