use std::collections::BTreeMap;

use coda::{
    CodingKey, Decodable, DecodeError, DecodeErrorKind, Decoder, Encodable, EncodeError, Encoder,
};
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
}

impl Decodable for Point {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let fields = decoder.keyed_container()?;
        Ok(Point {
            x: fields.decode_i64(&CodingKey::new("x"))?,
            y: fields.decode_i64(&CodingKey::new("y"))?,
        })
    }
}

#[test]
fn missing_key_is_key_not_found() {
    coda_testhelpers::setup();

    let tree = object(&[("x", Value::I64(1))]);
    let error = from_value::<Point>(&tree).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::KeyNotFound);
    assert_eq!(error.path.to_string(), "y");
}

#[test]
fn null_for_required_field_is_value_not_found() {
    coda_testhelpers::setup();

    let tree = object(&[("x", Value::Null), ("y", Value::I64(2))]);
    let error = from_value::<Point>(&tree).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::ValueNotFound);
    assert_eq!(error.path.to_string(), "x");
}

#[test]
fn wrong_shape_is_type_mismatch() {
    coda_testhelpers::setup();

    let tree = object(&[("x", Value::from("three")), ("y", Value::I64(2))]);
    let error = from_value::<Point>(&tree).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::TypeMismatch { expected: "i64" });
    assert_eq!(error.path.to_string(), "x");

    let error = from_value::<Vec<i64>>(&Value::Bool(true)).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::TypeMismatch { expected: "array" });
}

#[test]
fn floats_do_not_satisfy_integer_requests() {
    coda_testhelpers::setup();

    let error = from_value::<i64>(&Value::F64(1.5)).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::TypeMismatch { expected: "i64" });
}

#[test]
fn integers_do_satisfy_float_requests() {
    coda_testhelpers::setup();

    assert_eq!(from_value::<f64>(&Value::I64(3)).unwrap(), 3.0);
    assert_eq!(from_value::<f32>(&Value::U64(4)).unwrap(), 4.0);
}

#[test]
fn out_of_range_numbers_are_data_corrupted() {
    coda_testhelpers::setup();

    let error = from_value::<u8>(&Value::I64(300)).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::DataCorrupted);

    let error = from_value::<u64>(&Value::I64(-1)).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::DataCorrupted);

    let error = from_value::<f32>(&Value::F64(1e300)).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::DataCorrupted);
}

#[test]
fn nested_failure_reports_the_full_path() {
    coda_testhelpers::setup();

    let tree = object(&[(
        "a",
        object(&[("b", Value::Array(vec![Value::I64(1), Value::from("x")]))]),
    )]);
    let error = from_value::<BTreeMap<String, BTreeMap<String, Vec<i64>>>>(&tree).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::TypeMismatch { expected: "i64" });
    assert_eq!(error.path.to_string(), "a.b[1]");
}

#[test]
fn odd_length_pair_sequence_is_data_corrupted() {
    coda_testhelpers::setup();

    let tree = Value::Array(vec![
        Value::Array(vec![Value::U64(1), Value::U64(2)]),
        Value::I64(10),
        Value::Array(vec![Value::U64(3), Value::U64(4)]),
    ]);
    let error = from_value::<BTreeMap<(u8, u8), i64>>(&tree).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::DataCorrupted);
}

#[test]
fn unparseable_integer_map_key_is_data_corrupted() {
    coda_testhelpers::setup();

    let tree = object(&[("twelve", Value::from("nope"))]);
    let error = from_value::<BTreeMap<u32, String>>(&tree).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::DataCorrupted);
    assert_eq!(error.path.to_string(), "twelve");
}

#[test]
fn decoding_null_as_a_container_is_value_not_found() {
    coda_testhelpers::setup();

    let error = from_value::<Point>(&Value::Null).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::ValueNotFound);

    let error = from_value::<Vec<i64>>(&Value::Null).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::ValueNotFound);
}

#[test]
fn errors_render_kind_path_and_message() {
    coda_testhelpers::setup();

    let tree = object(&[(
        "a",
        object(&[("b", Value::Array(vec![Value::I64(1), Value::from("x")]))]),
    )]);
    let error = from_value::<BTreeMap<String, BTreeMap<String, Vec<i64>>>>(&tree).unwrap_err();
    assert_eq!(
        error.to_string(),
        "type mismatch (expected i64) at a.b[1]: expected i64, found string"
    );
}

struct EncodesNothing;

impl Encodable for EncodesNothing {
    fn encode(&self, _encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        Ok(())
    }
}

#[test]
fn top_level_value_that_encodes_nothing_is_rejected() {
    coda_testhelpers::setup();

    let error = to_value(&EncodesNothing).unwrap_err();
    assert_eq!(error.path.to_string(), "<root>");
    assert!(error.message.contains("did not encode anything"));
}
