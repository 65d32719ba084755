use std::collections::BTreeMap;

use coda::{CodingKey, Decodable, DecodeError, Decoder, Encodable, EncodeError, Encoder};
use coda_value::{Value, from_value, to_value};
use indexmap::IndexMap;

fn object(fields: &[(&str, Value)]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect::<IndexMap<_, _>>(),
    )
}

#[derive(Debug, PartialEq)]
struct Point {
    x: i64,
    y: i64,
    label: Option<String>,
}

impl Encodable for Point {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let mut fields = encoder.keyed_container();
        fields.encode_i64(&CodingKey::new("x"), self.x)?;
        fields.encode_i64(&CodingKey::new("y"), self.y)?;
        fields.encode_if_present(&CodingKey::new("label"), self.label.as_ref())?;
        Ok(())
    }
}

impl Decodable for Point {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let fields = decoder.keyed_container()?;
        Ok(Point {
            x: fields.decode_i64(&CodingKey::new("x"))?,
            y: fields.decode_i64(&CodingKey::new("y"))?,
            label: fields.decode_string_if_present(&CodingKey::new("label"))?,
        })
    }
}

#[test]
fn scalars_round_trip() {
    coda_testhelpers::setup();

    assert_eq!(to_value(&true).unwrap(), Value::Bool(true));
    assert_eq!(from_value::<bool>(&Value::Bool(false)).unwrap(), false);

    assert_eq!(to_value(&-42i64).unwrap(), Value::I64(-42));
    assert_eq!(from_value::<i64>(&Value::I64(-42)).unwrap(), -42);

    assert_eq!(to_value(&u64::MAX).unwrap(), Value::U64(u64::MAX));
    assert_eq!(from_value::<u64>(&Value::U64(u64::MAX)).unwrap(), u64::MAX);

    assert_eq!(to_value(&1.25f64).unwrap(), Value::F64(1.25));
    assert_eq!(from_value::<f64>(&Value::F64(1.25)).unwrap(), 1.25);

    assert_eq!(to_value("hello").unwrap(), Value::from("hello"));
    assert_eq!(from_value::<String>(&Value::from("hello")).unwrap(), "hello");
}

#[test]
fn narrow_integers_widen_and_come_back() {
    coda_testhelpers::setup();

    assert_eq!(to_value(&7u8).unwrap(), Value::U64(7));
    assert_eq!(from_value::<u8>(&Value::U64(7)).unwrap(), 7);
    assert_eq!(from_value::<i16>(&Value::I64(-300)).unwrap(), -300);
    // An unsigned source value still satisfies a signed request in range.
    assert_eq!(from_value::<i8>(&Value::U64(100)).unwrap(), 100);
}

#[test]
fn optionals_round_trip_through_null() {
    coda_testhelpers::setup();

    assert_eq!(to_value(&None::<i64>).unwrap(), Value::Null);
    assert_eq!(to_value(&Some(5i64)).unwrap(), Value::I64(5));
    assert_eq!(from_value::<Option<i64>>(&Value::Null).unwrap(), None);
    assert_eq!(from_value::<Option<i64>>(&Value::I64(5)).unwrap(), Some(5));
}

#[test]
fn sequences_preserve_order() {
    coda_testhelpers::setup();

    let values = vec![3i64, 1, 2];
    let tree = to_value(&values).unwrap();
    assert_eq!(
        tree,
        Value::Array(vec![Value::I64(3), Value::I64(1), Value::I64(2)])
    );
    assert_eq!(from_value::<Vec<i64>>(&tree).unwrap(), values);

    let nested = vec![vec![1u8], vec![], vec![2, 3]];
    let tree = to_value(&nested).unwrap();
    assert_eq!(from_value::<Vec<Vec<u8>>>(&tree).unwrap(), nested);
}

#[test]
fn tuples_encode_as_arrays() {
    coda_testhelpers::setup();

    let pair = ("id".to_string(), 9u32);
    let tree = to_value(&pair).unwrap();
    assert_eq!(tree, Value::Array(vec![Value::from("id"), Value::U64(9)]));
    assert_eq!(from_value::<(String, u32)>(&tree).unwrap(), pair);
}

#[test]
fn keyed_struct_round_trips() {
    coda_testhelpers::setup();

    let point = Point {
        x: 3,
        y: -4,
        label: Some("origin-ish".to_string()),
    };
    let tree = to_value(&point).unwrap();
    assert_eq!(
        tree,
        object(&[
            ("x", Value::I64(3)),
            ("y", Value::I64(-4)),
            ("label", Value::from("origin-ish")),
        ])
    );
    assert_eq!(from_value::<Point>(&tree).unwrap(), point);
}

#[test]
fn absent_optional_field_is_simply_omitted() {
    coda_testhelpers::setup();

    let point = Point {
        x: 1,
        y: 2,
        label: None,
    };
    let tree = to_value(&point).unwrap();
    assert_eq!(tree, object(&[("x", Value::I64(1)), ("y", Value::I64(2))]));
    assert_eq!(from_value::<Point>(&tree).unwrap(), point);
}

#[test]
fn string_keyed_maps_become_objects() {
    coda_testhelpers::setup();

    let mut ages = BTreeMap::new();
    ages.insert("ada".to_string(), 36i64);
    ages.insert("grace".to_string(), 85i64);

    let tree = to_value(&ages).unwrap();
    assert_eq!(
        tree,
        object(&[("ada", Value::I64(36)), ("grace", Value::I64(85))])
    );
    assert_eq!(from_value::<BTreeMap<String, i64>>(&tree).unwrap(), ages);
}

#[test]
fn integer_keyed_maps_become_objects_with_decimal_keys() {
    coda_testhelpers::setup();

    let mut names = BTreeMap::new();
    names.insert(1u32, "one".to_string());
    names.insert(12u32, "twelve".to_string());

    let tree = to_value(&names).unwrap();
    assert_eq!(
        tree,
        object(&[("1", Value::from("one")), ("12", Value::from("twelve"))])
    );
    assert_eq!(from_value::<BTreeMap<u32, String>>(&tree).unwrap(), names);
}

#[test]
fn structured_keys_fall_back_to_pair_sequences() {
    coda_testhelpers::setup();

    let mut grid = BTreeMap::new();
    grid.insert((1u8, 2u8), 10i64);
    grid.insert((3u8, 4u8), 20i64);

    let tree = to_value(&grid).unwrap();
    assert_eq!(
        tree,
        Value::Array(vec![
            Value::Array(vec![Value::U64(1), Value::U64(2)]),
            Value::I64(10),
            Value::Array(vec![Value::U64(3), Value::U64(4)]),
            Value::I64(20),
        ])
    );
    assert_eq!(from_value::<BTreeMap<(u8, u8), i64>>(&tree).unwrap(), grid);
}

#[test]
fn empty_map_encodes_as_empty_object() {
    coda_testhelpers::setup();

    let empty = BTreeMap::<String, i64>::new();
    let tree = to_value(&empty).unwrap();
    assert_eq!(tree, Value::Object(IndexMap::new()));
    assert_eq!(from_value::<BTreeMap<String, i64>>(&tree).unwrap(), empty);
}

#[test]
fn stub_value_graphs_round_trip() {
    coda_testhelpers::setup();

    let mut stub = coda_testhelpers::StubValues::new();
    let points: Vec<Point> = (0..4)
        .map(|_| Point {
            x: stub.next_int(),
            y: stub.next_int(),
            label: stub.next_bool().then(|| stub.next_string()),
        })
        .collect();

    let tree = to_value(&points).unwrap();
    assert_eq!(from_value::<Vec<Point>>(&tree).unwrap(), points);
}

#[test]
fn maps_nest_inside_structs_and_sequences() {
    coda_testhelpers::setup();

    let mut inner = BTreeMap::new();
    inner.insert("a".to_string(), vec![1i64, 2]);
    let outer = vec![inner.clone(), BTreeMap::new()];

    let tree = to_value(&outer).unwrap();
    assert_eq!(
        from_value::<Vec<BTreeMap<String, Vec<i64>>>>(&tree).unwrap(),
        outer
    );
}
