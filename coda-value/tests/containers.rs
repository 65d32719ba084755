use coda::{
    CodingKey, Decodable, DecodeError, DecodeErrorKind, Decoder, Encodable, EncodeError, Encoder,
    UserInfoKey,
};
use coda_value::{Value, ValueDecoder, ValueEncoder, from_value_with, to_value, to_value_with};
use indexmap::IndexMap;

fn object(fields: &[(&str, Value)]) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect::<IndexMap<_, _>>(),
    )
}

#[test]
fn unkeyed_cursor_advances_only_on_success() {
    coda_testhelpers::setup();

    let tree = Value::Array(vec![Value::I64(1), Value::Null, Value::from("end")]);
    let mut decoder = ValueDecoder::new(&tree);
    let mut items = decoder.unkeyed_container().unwrap();

    assert_eq!(items.count(), Some(3));
    assert_eq!(items.current_index(), 0);

    // A failed typed decode leaves the cursor in place.
    let error = items.decode_bool().unwrap_err();
    assert!(matches!(error.kind, DecodeErrorKind::TypeMismatch { .. }));
    assert_eq!(items.current_index(), 0);
    assert_eq!(items.decode_i64().unwrap(), 1);

    // decode_nil consumes the element only when it really is null.
    assert!(items.decode_nil().unwrap());
    assert!(!items.is_at_end());
    assert!(!items.decode_nil().unwrap());
    assert_eq!(items.decode_string().unwrap(), "end");
    assert!(items.is_at_end());
}

#[test]
fn decoding_past_the_end_is_value_not_found() {
    coda_testhelpers::setup();

    let tree = Value::Array(vec![Value::I64(1)]);
    let mut decoder = ValueDecoder::new(&tree);
    let mut items = decoder.unkeyed_container().unwrap();

    assert_eq!(items.decode_i64().unwrap(), 1);
    let error = items.decode_i64().unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::ValueNotFound);
    assert_eq!(error.path.to_string(), "[1]");

    // The if_present variant converts "at end" into None instead.
    assert_eq!(items.decode_i64_if_present().unwrap(), None);
}

#[test]
fn value_decoder_consumes_its_element_once_handed_out() {
    coda_testhelpers::setup();

    let tree = Value::Array(vec![Value::I64(10), Value::I64(20)]);
    let mut decoder = ValueDecoder::new(&tree);
    let mut items = decoder.unkeyed_container().unwrap();

    let handed_out = items.value_decoder().unwrap();
    drop(handed_out);
    assert_eq!(items.current_index(), 1);
    assert_eq!(items.decode_i64().unwrap(), 20);
}

#[test]
fn keyed_presence_checks_do_not_mutate() {
    coda_testhelpers::setup();

    let tree = object(&[("present", Value::I64(1)), ("null", Value::Null)]);
    let mut decoder = ValueDecoder::new(&tree);
    let fields = decoder.keyed_container().unwrap();

    let key = CodingKey::new("present");
    assert!(fields.contains(&key));
    assert!(fields.contains(&key));
    assert!(!fields.decode_nil(&key).unwrap());
    assert_eq!(fields.decode_i64(&key).unwrap(), 1);
    // Values survive repeated reads.
    assert_eq!(fields.decode_i64(&key).unwrap(), 1);

    assert!(fields.decode_nil(&CodingKey::new("null")).unwrap());
    assert!(!fields.contains(&CodingKey::new("absent")));
    let error = fields.decode_nil(&CodingKey::new("absent")).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::KeyNotFound);
}

#[test]
fn keyed_if_present_folds_absent_and_null_into_none() {
    coda_testhelpers::setup();

    let tree = object(&[("a", Value::I64(1)), ("b", Value::Null)]);
    let mut decoder = ValueDecoder::new(&tree);
    let fields = decoder.keyed_container().unwrap();

    assert_eq!(
        fields.decode_i64_if_present(&CodingKey::new("a")).unwrap(),
        Some(1)
    );
    assert_eq!(fields.decode_i64_if_present(&CodingKey::new("b")).unwrap(), None);
    assert_eq!(
        fields.decode_i64_if_present(&CodingKey::new("c")).unwrap(),
        None
    );

    // Present with the wrong shape still fails.
    let tree = object(&[("a", Value::from("one"))]);
    let mut decoder = ValueDecoder::new(&tree);
    let fields = decoder.keyed_container().unwrap();
    let error = fields
        .decode_i64_if_present(&CodingKey::new("a"))
        .unwrap_err();
    assert!(matches!(error.kind, DecodeErrorKind::TypeMismatch { .. }));
}

#[test]
fn all_keys_lists_material_entries_in_order() {
    coda_testhelpers::setup();

    let tree = object(&[("zulu", Value::I64(1)), ("7", Value::I64(2))]);
    let mut decoder = ValueDecoder::new(&tree);
    let fields = decoder.keyed_container().unwrap();

    // Querying for a key never makes it appear.
    let _ = fields.contains(&CodingKey::new("ghost"));
    let keys = fields.all_keys();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].name(), "zulu");
    assert_eq!(keys[0].int_value(), None);
    assert_eq!(keys[1].name(), "7");
    assert_eq!(keys[1].int_value(), Some(7));
}

#[test]
fn nested_containers_build_nested_trees() {
    coda_testhelpers::setup();

    let mut encoder = ValueEncoder::new();
    {
        let mut fields = encoder.keyed_container();
        let mut items = fields.nested_unkeyed(&CodingKey::new("items"));
        items.encode_i64(1).unwrap();
        assert_eq!(items.count(), 1);
        let mut entry = items.nested_keyed();
        entry.encode_str(&CodingKey::new("name"), "last").unwrap();
    }
    assert_eq!(
        encoder.into_value().unwrap(),
        object(&[(
            "items",
            Value::Array(vec![Value::I64(1), object(&[("name", Value::from("last"))])]),
        )])
    );
}

#[derive(Debug)]
struct Base {
    id: u64,
}

impl Encodable for Base {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let mut fields = encoder.keyed_container();
        fields.encode_u64(&CodingKey::new("id"), self.id)
    }
}

impl Decodable for Base {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let fields = decoder.keyed_container()?;
        Ok(Base {
            id: fields.decode_u64(&CodingKey::new("id"))?,
        })
    }
}

#[derive(Debug)]
struct Derived {
    base: Base,
    name: String,
}

impl Encodable for Derived {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let mut fields = encoder.keyed_container();
        fields.encode_str(&CodingKey::new("name"), &self.name)?;
        let mut delegate = fields.super_encoder();
        self.base.encode(&mut *delegate)
    }
}

impl Decodable for Derived {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let fields = decoder.keyed_container()?;
        let name = fields.decode_string(&CodingKey::new("name"))?;
        let mut delegate = fields.super_decoder()?;
        Ok(Derived {
            base: Base::decode(&mut *delegate)?,
            name,
        })
    }
}

#[test]
fn super_encoder_nests_delegated_state_under_super() {
    coda_testhelpers::setup();

    let value = Derived {
        base: Base { id: 7 },
        name: "widget".to_string(),
    };
    let tree = to_value(&value).unwrap();
    assert_eq!(
        tree,
        object(&[
            ("name", Value::from("widget")),
            ("super", object(&[("id", Value::U64(7))])),
        ])
    );

    let back: Derived = coda_value::from_value(&tree).unwrap();
    assert_eq!(back.base.id, 7);
    assert_eq!(back.name, "widget");
}

#[test]
fn super_decoder_paths_extend_through_the_super_key() {
    coda_testhelpers::setup();

    // Wrong type inside the delegated scope pinpoints super.id.
    let tree = object(&[
        ("name", Value::from("widget")),
        ("super", object(&[("id", Value::from("seven"))])),
    ]);
    let error = coda_value::from_value::<Derived>(&tree).unwrap_err();
    assert!(matches!(error.kind, DecodeErrorKind::TypeMismatch { .. }));
    assert_eq!(error.path.to_string(), "super.id");
}

const FACTOR: UserInfoKey = UserInfoKey::new("factor");

struct Scaled(i64);

impl Encodable for Scaled {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let factor = encoder.user_info().get::<i64>(&FACTOR).copied().unwrap_or(1);
        encoder.single_value_container().encode_i64(self.0 * factor)
    }
}

impl Decodable for Scaled {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let factor = decoder.user_info().get::<i64>(&FACTOR).copied().unwrap_or(1);
        let raw = decoder.single_value_container()?.decode_i64()?;
        Ok(Scaled(raw / factor))
    }
}

#[test]
fn user_info_reaches_every_nesting_level() {
    coda_testhelpers::setup();

    let mut info = coda::UserInfo::new();
    info.insert(FACTOR, 3i64);

    let values = vec![Scaled(1), Scaled(2)];
    let tree = to_value_with(&values, info.clone()).unwrap();
    assert_eq!(tree, Value::Array(vec![Value::I64(3), Value::I64(6)]));

    let back: Vec<Scaled> = from_value_with(&tree, info).unwrap();
    assert_eq!(back[0].0, 1);
    assert_eq!(back[1].0, 2);

    // Without the context entry the raw numbers come back unscaled.
    let raw: Vec<Scaled> = coda_value::from_value(&tree).unwrap();
    assert_eq!(raw[0].0, 3);
}

#[test]
fn encode_all_appends_in_iteration_order() {
    coda_testhelpers::setup();

    let mut encoder = ValueEncoder::new();
    {
        let mut items = encoder.unkeyed_container();
        items.encode_all([10i64, 20, 30]).unwrap();
        assert_eq!(items.count(), 3);
    }
    assert_eq!(
        encoder.into_value().unwrap(),
        Value::Array(vec![Value::I64(10), Value::I64(20), Value::I64(30)])
    );
}

#[test]
fn keyed_encoding_is_last_write_wins() {
    coda_testhelpers::setup();

    let mut encoder = ValueEncoder::new();
    {
        let mut fields = encoder.keyed_container();
        fields.encode_i64(&CodingKey::new("a"), 1).unwrap();
        fields.encode_i64(&CodingKey::new("a"), 2).unwrap();
    }
    assert_eq!(encoder.into_value().unwrap(), object(&[("a", Value::I64(2))]));
}
