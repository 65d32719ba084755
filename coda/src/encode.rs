//! The encode half of the protocol: [`Encodable`], [`Encoder`], and the
//! three encoding container views.
//!
//! An encoder hands out exactly one container per logical scope. Containers
//! are object-safe so they can cross non-generic boundaries; the generic
//! conveniences (`encode::<T>`, bulk append, conditional encode) live as
//! inherent methods on the trait objects.

use alloc::boxed::Box;

use crate::error::EncodeError;
use crate::key::{CodingKey, CodingPath};
use crate::user_info::UserInfo;

/// A type that can serialize itself to the abstract container model.
pub trait Encodable {
    /// Encode `self` by requesting a container from `encoder` and performing
    /// typed field or element operations on it.
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError>;
}

/// The entry point a value's [`Encodable::encode`] receives.
///
/// Hands out exactly one container per logical scope and threads the coding
/// path and side-channel context through nested calls.
pub trait Encoder {
    /// The nesting chain from the document root to the current value.
    fn coding_path(&self) -> &CodingPath;

    /// Contextual values for this pass, read-only during traversal.
    fn user_info(&self) -> &UserInfo;

    /// An associative (field-name-addressed) view into the output.
    fn keyed_container(&mut self) -> Box<dyn KeyedEncodingContainer + '_>;

    /// A sequential (position-addressed) view into the output.
    fn unkeyed_container(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_>;

    /// A view for a single scalar with no internal structure.
    fn single_value_container(&mut self) -> Box<dyn SingleValueEncodingContainer + '_>;
}

/// Encodes named fields.
///
/// Encoding the same key twice is adapter-defined; last-write-wins is the
/// conventional choice. Field insertion order must be preserved by adapters
/// whose output format is order-sensitive.
pub trait KeyedEncodingContainer {
    /// The path of this container within the document.
    fn coding_path(&self) -> &CodingPath;

    /// Encode an explicit null for `key`.
    fn encode_nil(&mut self, key: &CodingKey) -> Result<(), EncodeError>;

    /// Encode a boolean field.
    fn encode_bool(&mut self, key: &CodingKey, value: bool) -> Result<(), EncodeError>;
    /// Encode a signed 8-bit integer field.
    fn encode_i8(&mut self, key: &CodingKey, value: i8) -> Result<(), EncodeError>;
    /// Encode a signed 16-bit integer field.
    fn encode_i16(&mut self, key: &CodingKey, value: i16) -> Result<(), EncodeError>;
    /// Encode a signed 32-bit integer field.
    fn encode_i32(&mut self, key: &CodingKey, value: i32) -> Result<(), EncodeError>;
    /// Encode a signed 64-bit integer field.
    fn encode_i64(&mut self, key: &CodingKey, value: i64) -> Result<(), EncodeError>;
    /// Encode a platform-width signed integer field.
    fn encode_isize(&mut self, key: &CodingKey, value: isize) -> Result<(), EncodeError>;
    /// Encode an unsigned 8-bit integer field.
    fn encode_u8(&mut self, key: &CodingKey, value: u8) -> Result<(), EncodeError>;
    /// Encode an unsigned 16-bit integer field.
    fn encode_u16(&mut self, key: &CodingKey, value: u16) -> Result<(), EncodeError>;
    /// Encode an unsigned 32-bit integer field.
    fn encode_u32(&mut self, key: &CodingKey, value: u32) -> Result<(), EncodeError>;
    /// Encode an unsigned 64-bit integer field.
    fn encode_u64(&mut self, key: &CodingKey, value: u64) -> Result<(), EncodeError>;
    /// Encode a platform-width unsigned integer field.
    fn encode_usize(&mut self, key: &CodingKey, value: usize) -> Result<(), EncodeError>;
    /// Encode a 32-bit floating point field.
    fn encode_f32(&mut self, key: &CodingKey, value: f32) -> Result<(), EncodeError>;
    /// Encode a 64-bit floating point field.
    fn encode_f64(&mut self, key: &CodingKey, value: f64) -> Result<(), EncodeError>;
    /// Encode a string field.
    fn encode_str(&mut self, key: &CodingKey, value: &str) -> Result<(), EncodeError>;

    /// A keyed container nested under `key`.
    fn nested_keyed(&mut self, key: &CodingKey) -> Box<dyn KeyedEncodingContainer + '_>;

    /// An unkeyed container nested under `key`.
    fn nested_unkeyed(&mut self, key: &CodingKey) -> Box<dyn UnkeyedEncodingContainer + '_>;

    /// A sub-encoder scoped to the conventional [`CodingKey::SUPER`] field,
    /// for delegating part of a value's encoding to another routine.
    fn super_encoder(&mut self) -> Box<dyn Encoder + '_>;

    /// A sub-encoder scoped to `key`.
    fn super_encoder_for(&mut self, key: &CodingKey) -> Box<dyn Encoder + '_>;

    /// A sub-encoder that writes the value for `key`.
    ///
    /// This is the seam generic encodes go through: the nested value repeats
    /// the whole protocol against the returned encoder.
    fn value_encoder(&mut self, key: &CodingKey) -> Box<dyn Encoder + '_>;
}

impl<'c> dyn KeyedEncodingContainer + 'c {
    /// Encode any [`Encodable`] value for `key`.
    pub fn encode<T: Encodable + ?Sized>(
        &mut self,
        key: &CodingKey,
        value: &T,
    ) -> Result<(), EncodeError> {
        let mut encoder = self.value_encoder(key);
        value.encode(&mut *encoder)
    }

    /// Encode `value` for `key` when present; a no-op on `None`.
    pub fn encode_if_present<T: Encodable>(
        &mut self,
        key: &CodingKey,
        value: Option<&T>,
    ) -> Result<(), EncodeError> {
        match value {
            Some(value) => self.encode(key, value),
            None => Ok(()),
        }
    }

    /// Encode a shared object for `key`.
    ///
    /// Identical to [`encode`](Self::encode): conditional,
    /// identity-preserving semantics are a capability individual adapters
    /// may offer through their own surface, not a mechanism the core
    /// protocol enforces.
    pub fn encode_conditional<T: Encodable>(
        &mut self,
        key: &CodingKey,
        value: &T,
    ) -> Result<(), EncodeError> {
        self.encode(key, value)
    }
}

/// Encodes an ordered sequence of values.
///
/// Each call appends one logical element and increments [`count`]; the order
/// of calls determines output order.
///
/// [`count`]: UnkeyedEncodingContainer::count
pub trait UnkeyedEncodingContainer {
    /// The path of this container within the document.
    fn coding_path(&self) -> &CodingPath;

    /// Running number of elements appended so far.
    fn count(&self) -> usize;

    /// Append an explicit null.
    fn encode_nil(&mut self) -> Result<(), EncodeError>;

    /// Append a boolean.
    fn encode_bool(&mut self, value: bool) -> Result<(), EncodeError>;
    /// Append a signed 8-bit integer.
    fn encode_i8(&mut self, value: i8) -> Result<(), EncodeError>;
    /// Append a signed 16-bit integer.
    fn encode_i16(&mut self, value: i16) -> Result<(), EncodeError>;
    /// Append a signed 32-bit integer.
    fn encode_i32(&mut self, value: i32) -> Result<(), EncodeError>;
    /// Append a signed 64-bit integer.
    fn encode_i64(&mut self, value: i64) -> Result<(), EncodeError>;
    /// Append a platform-width signed integer.
    fn encode_isize(&mut self, value: isize) -> Result<(), EncodeError>;
    /// Append an unsigned 8-bit integer.
    fn encode_u8(&mut self, value: u8) -> Result<(), EncodeError>;
    /// Append an unsigned 16-bit integer.
    fn encode_u16(&mut self, value: u16) -> Result<(), EncodeError>;
    /// Append an unsigned 32-bit integer.
    fn encode_u32(&mut self, value: u32) -> Result<(), EncodeError>;
    /// Append an unsigned 64-bit integer.
    fn encode_u64(&mut self, value: u64) -> Result<(), EncodeError>;
    /// Append a platform-width unsigned integer.
    fn encode_usize(&mut self, value: usize) -> Result<(), EncodeError>;
    /// Append a 32-bit floating point number.
    fn encode_f32(&mut self, value: f32) -> Result<(), EncodeError>;
    /// Append a 64-bit floating point number.
    fn encode_f64(&mut self, value: f64) -> Result<(), EncodeError>;
    /// Append a string.
    fn encode_str(&mut self, value: &str) -> Result<(), EncodeError>;

    /// A keyed container appended as the next element.
    fn nested_keyed(&mut self) -> Box<dyn KeyedEncodingContainer + '_>;

    /// An unkeyed container appended as the next element.
    fn nested_unkeyed(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_>;

    /// A sub-encoder that writes the next element.
    fn super_encoder(&mut self) -> Box<dyn Encoder + '_>;

    /// A sub-encoder that writes the next element; the seam generic encodes
    /// go through.
    fn value_encoder(&mut self) -> Box<dyn Encoder + '_>;
}

impl<'c> dyn UnkeyedEncodingContainer + 'c {
    /// Append any [`Encodable`] value.
    pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        let mut encoder = self.value_encoder();
        value.encode(&mut *encoder)
    }

    /// Append every element of `values`, equivalent to looping
    /// [`encode`](Self::encode) over each one.
    pub fn encode_all<I>(&mut self, values: I) -> Result<(), EncodeError>
    where
        I: IntoIterator,
        I::Item: Encodable,
    {
        for value in values {
            self.encode(&value)?;
        }
        Ok(())
    }
}

/// Encodes exactly one value with no structure.
///
/// Exactly one encode call is meaningful per container instance; invoking
/// more than one is adapter-defined (most adapters simply overwrite).
pub trait SingleValueEncodingContainer {
    /// The path of this container within the document.
    fn coding_path(&self) -> &CodingPath;

    /// Encode an explicit null.
    fn encode_nil(&mut self) -> Result<(), EncodeError>;

    /// Encode a boolean.
    fn encode_bool(&mut self, value: bool) -> Result<(), EncodeError>;
    /// Encode a signed 8-bit integer.
    fn encode_i8(&mut self, value: i8) -> Result<(), EncodeError>;
    /// Encode a signed 16-bit integer.
    fn encode_i16(&mut self, value: i16) -> Result<(), EncodeError>;
    /// Encode a signed 32-bit integer.
    fn encode_i32(&mut self, value: i32) -> Result<(), EncodeError>;
    /// Encode a signed 64-bit integer.
    fn encode_i64(&mut self, value: i64) -> Result<(), EncodeError>;
    /// Encode a platform-width signed integer.
    fn encode_isize(&mut self, value: isize) -> Result<(), EncodeError>;
    /// Encode an unsigned 8-bit integer.
    fn encode_u8(&mut self, value: u8) -> Result<(), EncodeError>;
    /// Encode an unsigned 16-bit integer.
    fn encode_u16(&mut self, value: u16) -> Result<(), EncodeError>;
    /// Encode an unsigned 32-bit integer.
    fn encode_u32(&mut self, value: u32) -> Result<(), EncodeError>;
    /// Encode an unsigned 64-bit integer.
    fn encode_u64(&mut self, value: u64) -> Result<(), EncodeError>;
    /// Encode a platform-width unsigned integer.
    fn encode_usize(&mut self, value: usize) -> Result<(), EncodeError>;
    /// Encode a 32-bit floating point number.
    fn encode_f32(&mut self, value: f32) -> Result<(), EncodeError>;
    /// Encode a 64-bit floating point number.
    fn encode_f64(&mut self, value: f64) -> Result<(), EncodeError>;
    /// Encode a string.
    fn encode_str(&mut self, value: &str) -> Result<(), EncodeError>;

    /// A sub-encoder that writes this container's value; the seam generic
    /// encodes go through.
    fn value_encoder(&mut self) -> Box<dyn Encoder + '_>;
}

impl<'c> dyn SingleValueEncodingContainer + 'c {
    /// Encode any [`Encodable`] value.
    pub fn encode<T: Encodable + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        let mut encoder = self.value_encoder();
        value.encode(&mut *encoder)
    }
}
