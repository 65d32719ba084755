//! The decode half of the protocol: [`Decodable`], [`Decoder`], and the
//! three decoding container views.
//!
//! Decode containers are read-only views over the underlying data. The
//! failure ladder is fixed: an absent key is `KeyNotFound`, a present but
//! null value for a non-optional request is `ValueNotFound`, a wrong-shaped
//! value is `TypeMismatch`, and decoding past the end of a sequence is
//! always `ValueNotFound` — never `TypeMismatch`.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::key::{CodingKey, CodingPath};
use crate::user_info::UserInfo;

/// Default body for the keyed `decode_*_if_present` family: absent or null
/// becomes `None` locally, anything else delegates and propagates.
macro_rules! decode_keyed_if_present {
    ($self:ident, $key:ident, $method:ident) => {{
        if !$self.contains($key) {
            return Ok(None);
        }
        if $self.decode_nil($key)? {
            return Ok(None);
        }
        $self.$method($key).map(Some)
    }};
}

/// Default body for the unkeyed `decode_*_if_present` family: at end means
/// `None` without advancing, a null element is consumed.
macro_rules! decode_unkeyed_if_present {
    ($self:ident, $method:ident) => {{
        if $self.is_at_end() {
            return Ok(None);
        }
        if $self.decode_nil()? {
            return Ok(None);
        }
        $self.$method().map(Some)
    }};
}

/// A type that can construct itself from the abstract container model.
pub trait Decodable: Sized {
    /// Construct a value by requesting a container from `decoder` and
    /// performing typed field or element operations on it.
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError>;
}

/// The entry point a value's [`Decodable::decode`] receives.
///
/// Container constructors fail with `TypeMismatch` when the underlying data
/// has the wrong shape for the requested view, and with `ValueNotFound` when
/// it is null.
pub trait Decoder {
    /// The nesting chain from the document root to the current value.
    fn coding_path(&self) -> &CodingPath;

    /// Contextual values for this pass, read-only during traversal.
    fn user_info(&self) -> &UserInfo;

    /// An associative (field-name-addressed) view into the data.
    fn keyed_container(&mut self) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError>;

    /// A sequential (position-addressed) view into the data.
    fn unkeyed_container(&mut self) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError>;

    /// A view for a single scalar with no internal structure.
    fn single_value_container(
        &mut self,
    ) -> Result<Box<dyn SingleValueDecodingContainer + '_>, DecodeError>;
}

/// Decodes named fields.
///
/// All operations are non-mutating: presence checks are idempotent and
/// nothing here advances any cursor, so nested read access is safe.
pub trait KeyedDecodingContainer {
    /// The path of this container within the document.
    fn coding_path(&self) -> &CodingPath;

    /// All keys materially present in the underlying data, in adapter-defined
    /// order — never keys that were merely queried.
    fn all_keys(&self) -> Vec<CodingKey>;

    /// Whether the underlying data holds a value (including an explicit
    /// null) for `key`. Never fails and never mutates decode state.
    fn contains(&self, key: &CodingKey) -> bool;

    /// Whether the value for `key` is an explicit null.
    ///
    /// Fails with `KeyNotFound` when the key is absent entirely.
    fn decode_nil(&self, key: &CodingKey) -> Result<bool, DecodeError>;

    /// Decode a boolean field.
    fn decode_bool(&self, key: &CodingKey) -> Result<bool, DecodeError>;
    /// Decode a signed 8-bit integer field.
    fn decode_i8(&self, key: &CodingKey) -> Result<i8, DecodeError>;
    /// Decode a signed 16-bit integer field.
    fn decode_i16(&self, key: &CodingKey) -> Result<i16, DecodeError>;
    /// Decode a signed 32-bit integer field.
    fn decode_i32(&self, key: &CodingKey) -> Result<i32, DecodeError>;
    /// Decode a signed 64-bit integer field.
    fn decode_i64(&self, key: &CodingKey) -> Result<i64, DecodeError>;
    /// Decode a platform-width signed integer field.
    fn decode_isize(&self, key: &CodingKey) -> Result<isize, DecodeError>;
    /// Decode an unsigned 8-bit integer field.
    fn decode_u8(&self, key: &CodingKey) -> Result<u8, DecodeError>;
    /// Decode an unsigned 16-bit integer field.
    fn decode_u16(&self, key: &CodingKey) -> Result<u16, DecodeError>;
    /// Decode an unsigned 32-bit integer field.
    fn decode_u32(&self, key: &CodingKey) -> Result<u32, DecodeError>;
    /// Decode an unsigned 64-bit integer field.
    fn decode_u64(&self, key: &CodingKey) -> Result<u64, DecodeError>;
    /// Decode a platform-width unsigned integer field.
    fn decode_usize(&self, key: &CodingKey) -> Result<usize, DecodeError>;
    /// Decode a 32-bit floating point field.
    fn decode_f32(&self, key: &CodingKey) -> Result<f32, DecodeError>;
    /// Decode a 64-bit floating point field.
    fn decode_f64(&self, key: &CodingKey) -> Result<f64, DecodeError>;
    /// Decode a string field.
    fn decode_string(&self, key: &CodingKey) -> Result<String, DecodeError>;

    /// A keyed container nested under `key`.
    fn nested_keyed(
        &self,
        key: &CodingKey,
    ) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError>;

    /// An unkeyed container nested under `key`.
    fn nested_unkeyed(
        &self,
        key: &CodingKey,
    ) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError>;

    /// A sub-decoder scoped to the conventional [`CodingKey::SUPER`] field,
    /// sharing the underlying storage.
    fn super_decoder(&self) -> Result<Box<dyn Decoder + '_>, DecodeError>;

    /// A sub-decoder scoped to `key`, sharing the underlying storage.
    fn super_decoder_for(&self, key: &CodingKey) -> Result<Box<dyn Decoder + '_>, DecodeError>;

    /// A sub-decoder for the value under `key`; the seam generic decodes go
    /// through. Fails with `KeyNotFound` when the key is absent.
    fn value_decoder(&self, key: &CodingKey) -> Result<Box<dyn Decoder + '_>, DecodeError>;

    /// Decode a boolean field, or `None` when the key is absent or null.
    fn decode_bool_if_present(&self, key: &CodingKey) -> Result<Option<bool>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_bool)
    }
    /// Decode a signed 8-bit integer field, or `None` when absent or null.
    fn decode_i8_if_present(&self, key: &CodingKey) -> Result<Option<i8>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_i8)
    }
    /// Decode a signed 16-bit integer field, or `None` when absent or null.
    fn decode_i16_if_present(&self, key: &CodingKey) -> Result<Option<i16>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_i16)
    }
    /// Decode a signed 32-bit integer field, or `None` when absent or null.
    fn decode_i32_if_present(&self, key: &CodingKey) -> Result<Option<i32>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_i32)
    }
    /// Decode a signed 64-bit integer field, or `None` when absent or null.
    fn decode_i64_if_present(&self, key: &CodingKey) -> Result<Option<i64>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_i64)
    }
    /// Decode a platform-width signed integer field, or `None` when absent
    /// or null.
    fn decode_isize_if_present(&self, key: &CodingKey) -> Result<Option<isize>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_isize)
    }
    /// Decode an unsigned 8-bit integer field, or `None` when absent or null.
    fn decode_u8_if_present(&self, key: &CodingKey) -> Result<Option<u8>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_u8)
    }
    /// Decode an unsigned 16-bit integer field, or `None` when absent or null.
    fn decode_u16_if_present(&self, key: &CodingKey) -> Result<Option<u16>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_u16)
    }
    /// Decode an unsigned 32-bit integer field, or `None` when absent or null.
    fn decode_u32_if_present(&self, key: &CodingKey) -> Result<Option<u32>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_u32)
    }
    /// Decode an unsigned 64-bit integer field, or `None` when absent or null.
    fn decode_u64_if_present(&self, key: &CodingKey) -> Result<Option<u64>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_u64)
    }
    /// Decode a platform-width unsigned integer field, or `None` when absent
    /// or null.
    fn decode_usize_if_present(&self, key: &CodingKey) -> Result<Option<usize>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_usize)
    }
    /// Decode a 32-bit floating point field, or `None` when absent or null.
    fn decode_f32_if_present(&self, key: &CodingKey) -> Result<Option<f32>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_f32)
    }
    /// Decode a 64-bit floating point field, or `None` when absent or null.
    fn decode_f64_if_present(&self, key: &CodingKey) -> Result<Option<f64>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_f64)
    }
    /// Decode a string field, or `None` when absent or null.
    fn decode_string_if_present(&self, key: &CodingKey) -> Result<Option<String>, DecodeError> {
        decode_keyed_if_present!(self, key, decode_string)
    }
}

impl<'c> dyn KeyedDecodingContainer + 'c {
    /// Decode any [`Decodable`] value for `key`.
    pub fn decode<T: Decodable>(&self, key: &CodingKey) -> Result<T, DecodeError> {
        let mut decoder = self.value_decoder(key)?;
        T::decode(&mut *decoder)
    }

    /// Decode any [`Decodable`] value for `key`, or `None` when the key is
    /// absent or holds an explicit null.
    ///
    /// "Absent or null" is converted into `None` locally and never
    /// propagates as an error; any other failure (such as a type mismatch)
    /// still propagates.
    pub fn decode_if_present<T: Decodable>(
        &self,
        key: &CodingKey,
    ) -> Result<Option<T>, DecodeError> {
        if !self.contains(key) {
            return Ok(None);
        }
        if self.decode_nil(key)? {
            return Ok(None);
        }
        self.decode(key).map(Some)
    }
}

/// Decodes an ordered sequence of values.
///
/// Holds a zero-based cursor that advances by exactly one per successful
/// decode and never decreases; [`is_at_end`] becomes permanently true once
/// the cursor reaches the end.
///
/// [`is_at_end`]: UnkeyedDecodingContainer::is_at_end
pub trait UnkeyedDecodingContainer {
    /// The path of this container within the document.
    fn coding_path(&self) -> &CodingPath;

    /// Total number of elements, when the format knows it upfront.
    fn count(&self) -> Option<usize>;

    /// The zero-based cursor position.
    fn current_index(&self) -> usize;

    /// Whether the cursor is past the last element.
    fn is_at_end(&self) -> bool;

    /// Whether the next element is an explicit null.
    ///
    /// Consumes the element (advancing the cursor) only when it is null;
    /// a genuine value is left in place. Fails with `ValueNotFound` at end.
    fn decode_nil(&mut self) -> Result<bool, DecodeError>;

    /// Decode the next element as a boolean.
    fn decode_bool(&mut self) -> Result<bool, DecodeError>;
    /// Decode the next element as a signed 8-bit integer.
    fn decode_i8(&mut self) -> Result<i8, DecodeError>;
    /// Decode the next element as a signed 16-bit integer.
    fn decode_i16(&mut self) -> Result<i16, DecodeError>;
    /// Decode the next element as a signed 32-bit integer.
    fn decode_i32(&mut self) -> Result<i32, DecodeError>;
    /// Decode the next element as a signed 64-bit integer.
    fn decode_i64(&mut self) -> Result<i64, DecodeError>;
    /// Decode the next element as a platform-width signed integer.
    fn decode_isize(&mut self) -> Result<isize, DecodeError>;
    /// Decode the next element as an unsigned 8-bit integer.
    fn decode_u8(&mut self) -> Result<u8, DecodeError>;
    /// Decode the next element as an unsigned 16-bit integer.
    fn decode_u16(&mut self) -> Result<u16, DecodeError>;
    /// Decode the next element as an unsigned 32-bit integer.
    fn decode_u32(&mut self) -> Result<u32, DecodeError>;
    /// Decode the next element as an unsigned 64-bit integer.
    fn decode_u64(&mut self) -> Result<u64, DecodeError>;
    /// Decode the next element as a platform-width unsigned integer.
    fn decode_usize(&mut self) -> Result<usize, DecodeError>;
    /// Decode the next element as a 32-bit floating point number.
    fn decode_f32(&mut self) -> Result<f32, DecodeError>;
    /// Decode the next element as a 64-bit floating point number.
    fn decode_f64(&mut self) -> Result<f64, DecodeError>;
    /// Decode the next element as a string.
    fn decode_string(&mut self) -> Result<String, DecodeError>;

    /// A keyed container over the next element. Fails with `TypeMismatch`
    /// when the element is not object-shaped.
    fn nested_keyed(&mut self) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError>;

    /// An unkeyed container over the next element. Fails with `TypeMismatch`
    /// when the element is not array-shaped.
    fn nested_unkeyed(&mut self) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError>;

    /// A sub-decoder scoped to the next element, sharing the underlying
    /// storage. The element counts as consumed once the decoder is handed
    /// out.
    fn super_decoder(&mut self) -> Result<Box<dyn Decoder + '_>, DecodeError>;

    /// A sub-decoder for the next element; the seam generic decodes go
    /// through. The element counts as consumed once the decoder is handed
    /// out.
    fn value_decoder(&mut self) -> Result<Box<dyn Decoder + '_>, DecodeError>;

    /// Decode the next element as a boolean, or `None` at end or on null.
    fn decode_bool_if_present(&mut self) -> Result<Option<bool>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_bool)
    }
    /// Decode the next element as a signed 8-bit integer, or `None` at end
    /// or on null.
    fn decode_i8_if_present(&mut self) -> Result<Option<i8>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_i8)
    }
    /// Decode the next element as a signed 16-bit integer, or `None` at end
    /// or on null.
    fn decode_i16_if_present(&mut self) -> Result<Option<i16>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_i16)
    }
    /// Decode the next element as a signed 32-bit integer, or `None` at end
    /// or on null.
    fn decode_i32_if_present(&mut self) -> Result<Option<i32>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_i32)
    }
    /// Decode the next element as a signed 64-bit integer, or `None` at end
    /// or on null.
    fn decode_i64_if_present(&mut self) -> Result<Option<i64>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_i64)
    }
    /// Decode the next element as a platform-width signed integer, or `None`
    /// at end or on null.
    fn decode_isize_if_present(&mut self) -> Result<Option<isize>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_isize)
    }
    /// Decode the next element as an unsigned 8-bit integer, or `None` at
    /// end or on null.
    fn decode_u8_if_present(&mut self) -> Result<Option<u8>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_u8)
    }
    /// Decode the next element as an unsigned 16-bit integer, or `None` at
    /// end or on null.
    fn decode_u16_if_present(&mut self) -> Result<Option<u16>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_u16)
    }
    /// Decode the next element as an unsigned 32-bit integer, or `None` at
    /// end or on null.
    fn decode_u32_if_present(&mut self) -> Result<Option<u32>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_u32)
    }
    /// Decode the next element as an unsigned 64-bit integer, or `None` at
    /// end or on null.
    fn decode_u64_if_present(&mut self) -> Result<Option<u64>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_u64)
    }
    /// Decode the next element as a platform-width unsigned integer, or
    /// `None` at end or on null.
    fn decode_usize_if_present(&mut self) -> Result<Option<usize>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_usize)
    }
    /// Decode the next element as a 32-bit floating point number, or `None`
    /// at end or on null.
    fn decode_f32_if_present(&mut self) -> Result<Option<f32>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_f32)
    }
    /// Decode the next element as a 64-bit floating point number, or `None`
    /// at end or on null.
    fn decode_f64_if_present(&mut self) -> Result<Option<f64>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_f64)
    }
    /// Decode the next element as a string, or `None` at end or on null.
    fn decode_string_if_present(&mut self) -> Result<Option<String>, DecodeError> {
        decode_unkeyed_if_present!(self, decode_string)
    }
}

impl<'c> dyn UnkeyedDecodingContainer + 'c {
    /// Decode the next element as any [`Decodable`] value.
    pub fn decode<T: Decodable>(&mut self) -> Result<T, DecodeError> {
        let mut decoder = self.value_decoder()?;
        T::decode(&mut *decoder)
    }

    /// Decode the next element, or `None` when the container is at end or
    /// the next element is null. A null element is consumed; reaching the
    /// end does not advance the cursor.
    pub fn decode_if_present<T: Decodable>(&mut self) -> Result<Option<T>, DecodeError> {
        if self.is_at_end() {
            return Ok(None);
        }
        if self.decode_nil()? {
            return Ok(None);
        }
        self.decode().map(Some)
    }
}

/// Decodes exactly one value with no structure.
pub trait SingleValueDecodingContainer {
    /// The path of this container within the document.
    fn coding_path(&self) -> &CodingPath;

    /// Whether the value is an explicit null. Never fails.
    fn decode_nil(&self) -> bool;

    /// Decode the value as a boolean.
    fn decode_bool(&self) -> Result<bool, DecodeError>;
    /// Decode the value as a signed 8-bit integer.
    fn decode_i8(&self) -> Result<i8, DecodeError>;
    /// Decode the value as a signed 16-bit integer.
    fn decode_i16(&self) -> Result<i16, DecodeError>;
    /// Decode the value as a signed 32-bit integer.
    fn decode_i32(&self) -> Result<i32, DecodeError>;
    /// Decode the value as a signed 64-bit integer.
    fn decode_i64(&self) -> Result<i64, DecodeError>;
    /// Decode the value as a platform-width signed integer.
    fn decode_isize(&self) -> Result<isize, DecodeError>;
    /// Decode the value as an unsigned 8-bit integer.
    fn decode_u8(&self) -> Result<u8, DecodeError>;
    /// Decode the value as an unsigned 16-bit integer.
    fn decode_u16(&self) -> Result<u16, DecodeError>;
    /// Decode the value as an unsigned 32-bit integer.
    fn decode_u32(&self) -> Result<u32, DecodeError>;
    /// Decode the value as an unsigned 64-bit integer.
    fn decode_u64(&self) -> Result<u64, DecodeError>;
    /// Decode the value as a platform-width unsigned integer.
    fn decode_usize(&self) -> Result<usize, DecodeError>;
    /// Decode the value as a 32-bit floating point number.
    fn decode_f32(&self) -> Result<f32, DecodeError>;
    /// Decode the value as a 64-bit floating point number.
    fn decode_f64(&self) -> Result<f64, DecodeError>;
    /// Decode the value as a string.
    fn decode_string(&self) -> Result<String, DecodeError>;

    /// A sub-decoder over this container's value; the seam generic decodes
    /// go through.
    fn value_decoder(&self) -> Result<Box<dyn Decoder + '_>, DecodeError>;
}

impl<'c> dyn SingleValueDecodingContainer + 'c {
    /// Decode the value as any [`Decodable`] type.
    pub fn decode<T: Decodable>(&self) -> Result<T, DecodeError> {
        let mut decoder = self.value_decoder()?;
        T::decode(&mut *decoder)
    }
}
