//! Encoding containers that build a [`Value`] tree.

use coda::encode::{
    Encoder, KeyedEncodingContainer, SingleValueEncodingContainer, UnkeyedEncodingContainer,
};
use coda::{CodingKey, CodingPath, EncodeError, UserInfo};
use indexmap::IndexMap;

use crate::value::Value;

/// Coerce `slot` into an object, keeping an existing object's fields so a
/// second container over the same storage (the super-encoder pattern)
/// merges instead of clobbering.
fn keyed_object(slot: &mut Value) -> &mut IndexMap<String, Value> {
    if !matches!(slot, Value::Object(_)) {
        *slot = Value::Object(IndexMap::new());
    }
    let Value::Object(map) = slot else {
        unreachable!("slot was just coerced to an object")
    };
    map
}

fn unkeyed_array(slot: &mut Value) -> &mut Vec<Value> {
    if !matches!(slot, Value::Array(_)) {
        *slot = Value::Array(Vec::new());
    }
    let Value::Array(items) = slot else {
        unreachable!("slot was just coerced to an array")
    };
    items
}

/// Root encoder producing a [`Value`] tree.
pub struct ValueEncoder {
    path: CodingPath,
    user_info: UserInfo,
    root: Value,
    touched: bool,
}

impl ValueEncoder {
    /// A root encoder with an empty context map.
    pub fn new() -> Self {
        ValueEncoder::with_user_info(UserInfo::new())
    }

    /// A root encoder carrying contextual values for the whole pass.
    pub fn with_user_info(user_info: UserInfo) -> Self {
        ValueEncoder {
            path: CodingPath::root(),
            user_info,
            root: Value::Null,
            touched: false,
        }
    }

    /// The finished tree.
    ///
    /// Fails when no container was ever requested: a top-level value that
    /// encodes nothing has no defensible representation, not even null.
    pub fn into_value(self) -> Result<Value, EncodeError> {
        if !self.touched {
            return Err(EncodeError::invalid_value(
                self.path,
                "top-level value did not encode anything",
            ));
        }
        Ok(self.root)
    }
}

impl Default for ValueEncoder {
    fn default() -> Self {
        ValueEncoder::new()
    }
}

impl Encoder for ValueEncoder {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    fn keyed_container(&mut self) -> Box<dyn KeyedEncodingContainer + '_> {
        self.touched = true;
        Box::new(KeyedValueEncoder {
            map: keyed_object(&mut self.root),
            path: self.path.clone(),
            user_info: &self.user_info,
        })
    }

    fn unkeyed_container(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_> {
        self.touched = true;
        Box::new(UnkeyedValueEncoder {
            array: unkeyed_array(&mut self.root),
            path: self.path.clone(),
            user_info: &self.user_info,
        })
    }

    fn single_value_container(&mut self) -> Box<dyn SingleValueEncodingContainer + '_> {
        self.touched = true;
        Box::new(SingleValueValueEncoder {
            slot: &mut self.root,
            path: self.path.clone(),
            user_info: &self.user_info,
        })
    }
}

/// Sub-encoder writing into one slot of the tree under construction.
struct SlotEncoder<'a> {
    slot: &'a mut Value,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl Encoder for SlotEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        self.user_info
    }

    fn keyed_container(&mut self) -> Box<dyn KeyedEncodingContainer + '_> {
        Box::new(KeyedValueEncoder {
            map: keyed_object(&mut *self.slot),
            path: self.path.clone(),
            user_info: self.user_info,
        })
    }

    fn unkeyed_container(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_> {
        Box::new(UnkeyedValueEncoder {
            array: unkeyed_array(&mut *self.slot),
            path: self.path.clone(),
            user_info: self.user_info,
        })
    }

    fn single_value_container(&mut self) -> Box<dyn SingleValueEncodingContainer + '_> {
        Box::new(SingleValueValueEncoder {
            slot: &mut *self.slot,
            path: self.path.clone(),
            user_info: self.user_info,
        })
    }
}

struct KeyedValueEncoder<'a> {
    map: &'a mut IndexMap<String, Value>,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl KeyedValueEncoder<'_> {
    fn slot_encoder(&mut self, key: &CodingKey) -> Box<dyn Encoder + '_> {
        let path = self.path.child(key);
        let slot = self
            .map
            .entry(key.name().to_owned())
            .or_insert(Value::Null);
        Box::new(SlotEncoder {
            slot,
            path,
            user_info: self.user_info,
        })
    }
}

macro_rules! keyed_encode {
    ($($method:ident($v:ident: $ty:ty) => $conv:expr;)*) => {$(
        fn $method(&mut self, key: &CodingKey, $v: $ty) -> Result<(), EncodeError> {
            self.map.insert(key.name().to_owned(), $conv);
            Ok(())
        }
    )*};
}

impl KeyedEncodingContainer for KeyedValueEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn encode_nil(&mut self, key: &CodingKey) -> Result<(), EncodeError> {
        self.map.insert(key.name().to_owned(), Value::Null);
        Ok(())
    }

    keyed_encode! {
        encode_bool(value: bool) => Value::Bool(value);
        encode_i8(value: i8) => Value::I64(value as i64);
        encode_i16(value: i16) => Value::I64(value as i64);
        encode_i32(value: i32) => Value::I64(value as i64);
        encode_i64(value: i64) => Value::I64(value);
        encode_isize(value: isize) => Value::I64(value as i64);
        encode_u8(value: u8) => Value::U64(value as u64);
        encode_u16(value: u16) => Value::U64(value as u64);
        encode_u32(value: u32) => Value::U64(value as u64);
        encode_u64(value: u64) => Value::U64(value);
        encode_usize(value: usize) => Value::U64(value as u64);
        encode_f32(value: f32) => Value::F64(value as f64);
        encode_f64(value: f64) => Value::F64(value);
        encode_str(value: &str) => Value::String(value.to_owned());
    }

    fn nested_keyed(&mut self, key: &CodingKey) -> Box<dyn KeyedEncodingContainer + '_> {
        let path = self.path.child(key);
        let slot = self
            .map
            .entry(key.name().to_owned())
            .or_insert(Value::Null);
        Box::new(KeyedValueEncoder {
            map: keyed_object(slot),
            path,
            user_info: self.user_info,
        })
    }

    fn nested_unkeyed(&mut self, key: &CodingKey) -> Box<dyn UnkeyedEncodingContainer + '_> {
        let path = self.path.child(key);
        let slot = self
            .map
            .entry(key.name().to_owned())
            .or_insert(Value::Null);
        Box::new(UnkeyedValueEncoder {
            array: unkeyed_array(slot),
            path,
            user_info: self.user_info,
        })
    }

    fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.slot_encoder(&CodingKey::SUPER)
    }

    fn super_encoder_for(&mut self, key: &CodingKey) -> Box<dyn Encoder + '_> {
        self.slot_encoder(key)
    }

    fn value_encoder(&mut self, key: &CodingKey) -> Box<dyn Encoder + '_> {
        self.slot_encoder(key)
    }
}

struct UnkeyedValueEncoder<'a> {
    array: &'a mut Vec<Value>,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl UnkeyedValueEncoder<'_> {
    fn next_path(&self) -> CodingPath {
        self.path.child(&CodingKey::index(self.array.len()))
    }

    fn slot_encoder(&mut self) -> Box<dyn Encoder + '_> {
        let path = self.next_path();
        let index = self.array.len();
        self.array.push(Value::Null);
        Box::new(SlotEncoder {
            slot: &mut self.array[index],
            path,
            user_info: self.user_info,
        })
    }
}

macro_rules! unkeyed_encode {
    ($($method:ident($v:ident: $ty:ty) => $conv:expr;)*) => {$(
        fn $method(&mut self, $v: $ty) -> Result<(), EncodeError> {
            self.array.push($conv);
            Ok(())
        }
    )*};
}

impl UnkeyedEncodingContainer for UnkeyedValueEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn count(&self) -> usize {
        self.array.len()
    }

    fn encode_nil(&mut self) -> Result<(), EncodeError> {
        self.array.push(Value::Null);
        Ok(())
    }

    unkeyed_encode! {
        encode_bool(value: bool) => Value::Bool(value);
        encode_i8(value: i8) => Value::I64(value as i64);
        encode_i16(value: i16) => Value::I64(value as i64);
        encode_i32(value: i32) => Value::I64(value as i64);
        encode_i64(value: i64) => Value::I64(value);
        encode_isize(value: isize) => Value::I64(value as i64);
        encode_u8(value: u8) => Value::U64(value as u64);
        encode_u16(value: u16) => Value::U64(value as u64);
        encode_u32(value: u32) => Value::U64(value as u64);
        encode_u64(value: u64) => Value::U64(value);
        encode_usize(value: usize) => Value::U64(value as u64);
        encode_f32(value: f32) => Value::F64(value as f64);
        encode_f64(value: f64) => Value::F64(value);
        encode_str(value: &str) => Value::String(value.to_owned());
    }

    fn nested_keyed(&mut self) -> Box<dyn KeyedEncodingContainer + '_> {
        let path = self.next_path();
        let index = self.array.len();
        self.array.push(Value::Object(IndexMap::new()));
        Box::new(KeyedValueEncoder {
            map: keyed_object(&mut self.array[index]),
            path,
            user_info: self.user_info,
        })
    }

    fn nested_unkeyed(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_> {
        let path = self.next_path();
        let index = self.array.len();
        self.array.push(Value::Array(Vec::new()));
        Box::new(UnkeyedValueEncoder {
            array: unkeyed_array(&mut self.array[index]),
            path,
            user_info: self.user_info,
        })
    }

    fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.slot_encoder()
    }

    fn value_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.slot_encoder()
    }
}

struct SingleValueValueEncoder<'a> {
    slot: &'a mut Value,
    path: CodingPath,
    user_info: &'a UserInfo,
}

macro_rules! single_encode {
    ($($method:ident($v:ident: $ty:ty) => $conv:expr;)*) => {$(
        fn $method(&mut self, $v: $ty) -> Result<(), EncodeError> {
            *self.slot = $conv;
            Ok(())
        }
    )*};
}

impl SingleValueEncodingContainer for SingleValueValueEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn encode_nil(&mut self) -> Result<(), EncodeError> {
        *self.slot = Value::Null;
        Ok(())
    }

    single_encode! {
        encode_bool(value: bool) => Value::Bool(value);
        encode_i8(value: i8) => Value::I64(value as i64);
        encode_i16(value: i16) => Value::I64(value as i64);
        encode_i32(value: i32) => Value::I64(value as i64);
        encode_i64(value: i64) => Value::I64(value);
        encode_isize(value: isize) => Value::I64(value as i64);
        encode_u8(value: u8) => Value::U64(value as u64);
        encode_u16(value: u16) => Value::U64(value as u64);
        encode_u32(value: u32) => Value::U64(value as u64);
        encode_u64(value: u64) => Value::U64(value);
        encode_usize(value: usize) => Value::U64(value as u64);
        encode_f32(value: f32) => Value::F64(value as f64);
        encode_f64(value: f64) => Value::F64(value);
        encode_str(value: &str) => Value::String(value.to_owned());
    }

    fn value_encoder(&mut self) -> Box<dyn Encoder + '_> {
        Box::new(SlotEncoder {
            slot: &mut *self.slot,
            path: self.path.clone(),
            user_info: self.user_info,
        })
    }
}
