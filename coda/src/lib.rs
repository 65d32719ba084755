#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

extern crate alloc;

pub mod decode;
pub mod encode;
pub mod error;
mod impls;
pub mod key;
pub mod user_info;

pub use decode::{
    Decodable, Decoder, KeyedDecodingContainer, SingleValueDecodingContainer,
    UnkeyedDecodingContainer,
};
pub use encode::{
    Encodable, Encoder, KeyedEncodingContainer, SingleValueEncodingContainer,
    UnkeyedEncodingContainer,
};
pub use error::{DecodeError, DecodeErrorKind, EncodeError};
pub use key::{CodingKey, CodingPath};
pub use user_info::{UserInfo, UserInfoKey};
