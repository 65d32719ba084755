//! Decoding containers that read a [`Value`] tree.

use coda::decode::{
    Decoder, KeyedDecodingContainer, SingleValueDecodingContainer, UnkeyedDecodingContainer,
};
use coda::{CodingKey, CodingPath, DecodeError, UserInfo};
use indexmap::IndexMap;

use crate::value::Value;

/// Root decoder over a [`Value`] tree.
pub struct ValueDecoder<'v> {
    value: &'v Value,
    path: CodingPath,
    user_info: UserInfo,
}

impl<'v> ValueDecoder<'v> {
    /// A root decoder with an empty context map.
    pub fn new(value: &'v Value) -> Self {
        ValueDecoder::with_user_info(value, UserInfo::new())
    }

    /// A root decoder carrying contextual values for the whole pass.
    pub fn with_user_info(value: &'v Value, user_info: UserInfo) -> Self {
        ValueDecoder {
            value,
            path: CodingPath::root(),
            user_info,
        }
    }
}

impl Decoder for ValueDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    fn keyed_container(&mut self) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError> {
        keyed_view(self.value, &self.path, &self.user_info)
    }

    fn unkeyed_container(&mut self) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError> {
        unkeyed_view(self.value, &self.path, &self.user_info)
    }

    fn single_value_container(
        &mut self,
    ) -> Result<Box<dyn SingleValueDecodingContainer + '_>, DecodeError> {
        Ok(Box::new(SingleValueValueDecoder {
            value: self.value,
            path: self.path.clone(),
            user_info: &self.user_info,
        }))
    }
}

/// Sub-decoder over one value inside the tree.
struct SubDecoder<'a> {
    value: &'a Value,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl Decoder for SubDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        self.user_info
    }

    fn keyed_container(&mut self) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError> {
        keyed_view(self.value, &self.path, self.user_info)
    }

    fn unkeyed_container(&mut self) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError> {
        unkeyed_view(self.value, &self.path, self.user_info)
    }

    fn single_value_container(
        &mut self,
    ) -> Result<Box<dyn SingleValueDecodingContainer + '_>, DecodeError> {
        Ok(Box::new(SingleValueValueDecoder {
            value: self.value,
            path: self.path.clone(),
            user_info: self.user_info,
        }))
    }
}

fn keyed_view<'a>(
    value: &'a Value,
    path: &CodingPath,
    user_info: &'a UserInfo,
) -> Result<Box<dyn KeyedDecodingContainer + 'a>, DecodeError> {
    match value {
        Value::Object(map) => Ok(Box::new(KeyedValueDecoder {
            map,
            path: path.clone(),
            user_info,
        })),
        Value::Null => Err(DecodeError::value_not_found(
            path.clone(),
            "expected an object, found null",
        )),
        other => Err(DecodeError::type_mismatch(
            path.clone(),
            "object",
            format!("expected an object, found {}", other.type_name()),
        )),
    }
}

fn unkeyed_view<'a>(
    value: &'a Value,
    path: &CodingPath,
    user_info: &'a UserInfo,
) -> Result<Box<dyn UnkeyedDecodingContainer + 'a>, DecodeError> {
    match value {
        Value::Array(items) => Ok(Box::new(UnkeyedValueDecoder {
            items,
            index: 0,
            path: path.clone(),
            user_info,
        })),
        Value::Null => Err(DecodeError::value_not_found(
            path.clone(),
            "expected an array, found null",
        )),
        other => Err(DecodeError::type_mismatch(
            path.clone(),
            "array",
            format!("expected an array, found {}", other.type_name()),
        )),
    }
}

// --- Scalar readers --------------------------------------------------------

fn as_bool(value: &Value, path: &CodingPath) -> Result<bool, DecodeError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Null => Err(DecodeError::value_not_found(
            path.clone(),
            "expected a boolean, found null",
        )),
        other => Err(DecodeError::type_mismatch(
            path.clone(),
            "boolean",
            format!("expected a boolean, found {}", other.type_name()),
        )),
    }
}

fn as_string(value: &Value, path: &CodingPath) -> Result<String, DecodeError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Null => Err(DecodeError::value_not_found(
            path.clone(),
            "expected a string, found null",
        )),
        other => Err(DecodeError::type_mismatch(
            path.clone(),
            "string",
            format!("expected a string, found {}", other.type_name()),
        )),
    }
}

/// Integer reads go through `i128` so every source/target combination gets
/// the same two-step ladder: wrong shape (including floats) is a type
/// mismatch, right shape but out of range is corrupted data.
fn as_int<T: TryFrom<i128>>(
    value: &Value,
    expected: &'static str,
    path: &CodingPath,
) -> Result<T, DecodeError> {
    let wide = match value {
        Value::I64(number) => *number as i128,
        Value::U64(number) => *number as i128,
        Value::Null => {
            return Err(DecodeError::value_not_found(
                path.clone(),
                format!("expected {expected}, found null"),
            ));
        }
        other => {
            return Err(DecodeError::type_mismatch(
                path.clone(),
                expected,
                format!("expected {expected}, found {}", other.type_name()),
            ));
        }
    };
    T::try_from(wide).map_err(|_| {
        DecodeError::data_corrupted(
            path.clone(),
            format!("number {wide} does not fit in {expected}"),
        )
    })
}

fn as_f64(value: &Value, path: &CodingPath) -> Result<f64, DecodeError> {
    match value {
        Value::F64(number) => Ok(*number),
        Value::I64(number) => Ok(*number as f64),
        Value::U64(number) => Ok(*number as f64),
        Value::Null => Err(DecodeError::value_not_found(
            path.clone(),
            "expected a number, found null",
        )),
        other => Err(DecodeError::type_mismatch(
            path.clone(),
            "number",
            format!("expected a number, found {}", other.type_name()),
        )),
    }
}

fn as_f32(value: &Value, path: &CodingPath) -> Result<f32, DecodeError> {
    let wide = as_f64(value, path)?;
    if wide.is_finite() && (wide > f32::MAX as f64 || wide < f32::MIN as f64) {
        return Err(DecodeError::data_corrupted(
            path.clone(),
            format!("number {wide} does not fit in f32"),
        ));
    }
    Ok(wide as f32)
}

// --- Keyed -----------------------------------------------------------------

struct KeyedValueDecoder<'a> {
    map: &'a IndexMap<String, Value>,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl<'a> KeyedValueDecoder<'a> {
    fn fetch(&self, key: &CodingKey) -> Result<&'a Value, DecodeError> {
        self.map.get(key.name()).ok_or_else(|| {
            DecodeError::key_not_found(
                self.path.child(key),
                format!("no value for key `{}`", key.name()),
            )
        })
    }
}

macro_rules! keyed_decode {
    ($($method:ident -> $ty:ty => |$value:ident, $path:ident| $body:expr;)*) => {$(
        fn $method(&self, key: &CodingKey) -> Result<$ty, DecodeError> {
            let $path = self.path.child(key);
            let $value = self.fetch(key)?;
            $body
        }
    )*};
}

impl KeyedDecodingContainer for KeyedValueDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn all_keys(&self) -> Vec<CodingKey> {
        self.map
            .keys()
            .map(|name| {
                let key = CodingKey::new(name.clone());
                match name.parse::<usize>() {
                    Ok(index) => key.with_index(index),
                    Err(_) => key,
                }
            })
            .collect()
    }

    fn contains(&self, key: &CodingKey) -> bool {
        self.map.contains_key(key.name())
    }

    fn decode_nil(&self, key: &CodingKey) -> Result<bool, DecodeError> {
        Ok(self.fetch(key)?.is_null())
    }

    keyed_decode! {
        decode_bool -> bool => |value, path| as_bool(value, &path);
        decode_i8 -> i8 => |value, path| as_int(value, "i8", &path);
        decode_i16 -> i16 => |value, path| as_int(value, "i16", &path);
        decode_i32 -> i32 => |value, path| as_int(value, "i32", &path);
        decode_i64 -> i64 => |value, path| as_int(value, "i64", &path);
        decode_isize -> isize => |value, path| as_int(value, "isize", &path);
        decode_u8 -> u8 => |value, path| as_int(value, "u8", &path);
        decode_u16 -> u16 => |value, path| as_int(value, "u16", &path);
        decode_u32 -> u32 => |value, path| as_int(value, "u32", &path);
        decode_u64 -> u64 => |value, path| as_int(value, "u64", &path);
        decode_usize -> usize => |value, path| as_int(value, "usize", &path);
        decode_f32 -> f32 => |value, path| as_f32(value, &path);
        decode_f64 -> f64 => |value, path| as_f64(value, &path);
        decode_string -> String => |value, path| as_string(value, &path);
    }

    fn nested_keyed(
        &self,
        key: &CodingKey,
    ) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError> {
        keyed_view(self.fetch(key)?, &self.path.child(key), self.user_info)
    }

    fn nested_unkeyed(
        &self,
        key: &CodingKey,
    ) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError> {
        unkeyed_view(self.fetch(key)?, &self.path.child(key), self.user_info)
    }

    fn super_decoder(&self) -> Result<Box<dyn Decoder + '_>, DecodeError> {
        self.super_decoder_for(&CodingKey::SUPER)
    }

    fn super_decoder_for(&self, key: &CodingKey) -> Result<Box<dyn Decoder + '_>, DecodeError> {
        // An absent super slot decodes as null rather than failing, so a
        // delegating decode can probe for inherited fields.
        static NULL: Value = Value::Null;
        let value = self.map.get(key.name()).unwrap_or(&NULL);
        Ok(Box::new(SubDecoder {
            value,
            path: self.path.child(key),
            user_info: self.user_info,
        }))
    }

    fn value_decoder(&self, key: &CodingKey) -> Result<Box<dyn Decoder + '_>, DecodeError> {
        Ok(Box::new(SubDecoder {
            value: self.fetch(key)?,
            path: self.path.child(key),
            user_info: self.user_info,
        }))
    }
}

// --- Unkeyed ---------------------------------------------------------------

struct UnkeyedValueDecoder<'a> {
    items: &'a [Value],
    index: usize,
    path: CodingPath,
    user_info: &'a UserInfo,
}

impl<'a> UnkeyedValueDecoder<'a> {
    fn element_path(&self) -> CodingPath {
        self.path.child(&CodingKey::index(self.index))
    }

    fn peek(&self) -> Result<&'a Value, DecodeError> {
        self.items.get(self.index).ok_or_else(|| {
            DecodeError::value_not_found(
                self.element_path(),
                format!("unkeyed container is at end ({} elements)", self.items.len()),
            )
        })
    }
}

macro_rules! unkeyed_decode {
    ($($method:ident -> $ty:ty => |$value:ident, $path:ident| $body:expr;)*) => {$(
        fn $method(&mut self) -> Result<$ty, DecodeError> {
            let $path = self.element_path();
            let $value = self.peek()?;
            let decoded = $body?;
            self.index += 1;
            Ok(decoded)
        }
    )*};
}

impl UnkeyedDecodingContainer for UnkeyedValueDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn count(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn current_index(&self) -> usize {
        self.index
    }

    fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    fn decode_nil(&mut self) -> Result<bool, DecodeError> {
        let nil = self.peek()?.is_null();
        if nil {
            self.index += 1;
        }
        Ok(nil)
    }

    unkeyed_decode! {
        decode_bool -> bool => |value, path| as_bool(value, &path);
        decode_i8 -> i8 => |value, path| as_int(value, "i8", &path);
        decode_i16 -> i16 => |value, path| as_int(value, "i16", &path);
        decode_i32 -> i32 => |value, path| as_int(value, "i32", &path);
        decode_i64 -> i64 => |value, path| as_int(value, "i64", &path);
        decode_isize -> isize => |value, path| as_int(value, "isize", &path);
        decode_u8 -> u8 => |value, path| as_int(value, "u8", &path);
        decode_u16 -> u16 => |value, path| as_int(value, "u16", &path);
        decode_u32 -> u32 => |value, path| as_int(value, "u32", &path);
        decode_u64 -> u64 => |value, path| as_int(value, "u64", &path);
        decode_usize -> usize => |value, path| as_int(value, "usize", &path);
        decode_f32 -> f32 => |value, path| as_f32(value, &path);
        decode_f64 -> f64 => |value, path| as_f64(value, &path);
        decode_string -> String => |value, path| as_string(value, &path);
    }

    fn nested_keyed(&mut self) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError> {
        let path = self.element_path();
        let container = keyed_view(self.peek()?, &path, self.user_info)?;
        self.index += 1;
        Ok(container)
    }

    fn nested_unkeyed(&mut self) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError> {
        let path = self.element_path();
        let container = unkeyed_view(self.peek()?, &path, self.user_info)?;
        self.index += 1;
        Ok(container)
    }

    fn super_decoder(&mut self) -> Result<Box<dyn Decoder + '_>, DecodeError> {
        self.value_decoder()
    }

    fn value_decoder(&mut self) -> Result<Box<dyn Decoder + '_>, DecodeError> {
        let path = self.element_path();
        let value = self.peek()?;
        // The element counts as consumed as soon as the decoder is handed
        // out, whether or not the caller uses it.
        self.index += 1;
        Ok(Box::new(SubDecoder {
            value,
            path,
            user_info: self.user_info,
        }))
    }
}

// --- Single value ----------------------------------------------------------

struct SingleValueValueDecoder<'a> {
    value: &'a Value,
    path: CodingPath,
    user_info: &'a UserInfo,
}

macro_rules! single_decode {
    ($($method:ident -> $ty:ty => |$value:ident, $path:ident| $body:expr;)*) => {$(
        fn $method(&self) -> Result<$ty, DecodeError> {
            let $path = &self.path;
            let $value = self.value;
            $body
        }
    )*};
}

impl SingleValueDecodingContainer for SingleValueValueDecoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn decode_nil(&self) -> bool {
        self.value.is_null()
    }

    single_decode! {
        decode_bool -> bool => |value, path| as_bool(value, path);
        decode_i8 -> i8 => |value, path| as_int(value, "i8", path);
        decode_i16 -> i16 => |value, path| as_int(value, "i16", path);
        decode_i32 -> i32 => |value, path| as_int(value, "i32", path);
        decode_i64 -> i64 => |value, path| as_int(value, "i64", path);
        decode_isize -> isize => |value, path| as_int(value, "isize", path);
        decode_u8 -> u8 => |value, path| as_int(value, "u8", path);
        decode_u16 -> u16 => |value, path| as_int(value, "u16", path);
        decode_u32 -> u32 => |value, path| as_int(value, "u32", path);
        decode_u64 -> u64 => |value, path| as_int(value, "u64", path);
        decode_usize -> usize => |value, path| as_int(value, "usize", path);
        decode_f32 -> f32 => |value, path| as_f32(value, path);
        decode_f64 -> f64 => |value, path| as_f64(value, path);
        decode_string -> String => |value, path| as_string(value, path);
    }

    fn value_decoder(&self) -> Result<Box<dyn Decoder + '_>, DecodeError> {
        Ok(Box::new(SubDecoder {
            value: self.value,
            path: self.path.clone(),
            user_info: self.user_info,
        }))
    }
}
