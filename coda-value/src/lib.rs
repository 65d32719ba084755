#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod decoder;
mod encoder;
mod value;

pub use decoder::ValueDecoder;
pub use encoder::ValueEncoder;
pub use value::Value;

use coda::{DecodeError, Decodable, Encodable, EncodeError, UserInfo};

/// Encode `value` into a [`Value`] tree.
pub fn to_value<T: Encodable + ?Sized>(value: &T) -> Result<Value, EncodeError> {
    to_value_with(value, UserInfo::new())
}

/// Encode `value` into a [`Value`] tree, with `user_info` available to every
/// container during the pass.
pub fn to_value_with<T: Encodable + ?Sized>(
    value: &T,
    user_info: UserInfo,
) -> Result<Value, EncodeError> {
    tracing::trace!(type_name = core::any::type_name::<T>(), "encoding to value tree");
    let mut encoder = ValueEncoder::with_user_info(user_info);
    value.encode(&mut encoder)?;
    encoder.into_value()
}

/// Rebuild a `T` from a [`Value`] tree.
pub fn from_value<T: Decodable>(value: &Value) -> Result<T, DecodeError> {
    from_value_with(value, UserInfo::new())
}

/// Rebuild a `T` from a [`Value`] tree, with `user_info` available to every
/// container during the pass.
pub fn from_value_with<T: Decodable>(
    value: &Value,
    user_info: UserInfo,
) -> Result<T, DecodeError> {
    tracing::trace!(
        type_name = core::any::type_name::<T>(),
        shape = value.type_name(),
        "decoding from value tree"
    );
    let mut decoder = ValueDecoder::with_user_info(value, user_info);
    T::decode(&mut decoder)
}
