//! Standard encodings for primitives and composites.
//!
//! Every primitive goes through a single-value container; sequences go
//! through unkeyed containers preserving iteration order; maps go through a
//! keyed container when their keys encode as string or integer scalars, and
//! otherwise fall back to a flat sequence of alternating keys and values.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};
#[cfg(feature = "std")]
use std::hash::{BuildHasher, Hash};

use crate::decode::{
    Decodable, Decoder, KeyedDecodingContainer, SingleValueDecodingContainer,
    UnkeyedDecodingContainer,
};
use crate::encode::{
    Encodable, Encoder, KeyedEncodingContainer, SingleValueEncodingContainer,
    UnkeyedEncodingContainer,
};
use crate::error::{DecodeError, DecodeErrorKind, EncodeError};
use crate::key::{CodingKey, CodingPath};
use crate::user_info::UserInfo;

// --- Primitives ------------------------------------------------------------

macro_rules! primitive_codable {
    ($($ty:ty => $encode:ident, $decode:ident;)*) => {$(
        impl Encodable for $ty {
            fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
                encoder.single_value_container().$encode(*self)
            }
        }

        impl Decodable for $ty {
            fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
                decoder.single_value_container()?.$decode()
            }
        }
    )*};
}

primitive_codable! {
    bool => encode_bool, decode_bool;
    i8 => encode_i8, decode_i8;
    i16 => encode_i16, decode_i16;
    i32 => encode_i32, decode_i32;
    i64 => encode_i64, decode_i64;
    isize => encode_isize, decode_isize;
    u8 => encode_u8, decode_u8;
    u16 => encode_u16, decode_u16;
    u32 => encode_u32, decode_u32;
    u64 => encode_u64, decode_u64;
    usize => encode_usize, decode_usize;
    f32 => encode_f32, decode_f32;
    f64 => encode_f64, decode_f64;
}

impl Encodable for str {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encoder.single_value_container().encode_str(self)
    }
}

impl Encodable for String {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encoder.single_value_container().encode_str(self)
    }
}

impl Decodable for String {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        decoder.single_value_container()?.decode_string()
    }
}

impl Encodable for Cow<'_, str> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encoder.single_value_container().encode_str(self)
    }
}

impl Decodable for Cow<'_, str> {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        decoder
            .single_value_container()?
            .decode_string()
            .map(Cow::Owned)
    }
}

// --- Pointers --------------------------------------------------------------

impl<T: Encodable + ?Sized> Encodable for &T {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }
}

impl<T: Encodable + ?Sized> Encodable for Box<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        (**self).encode(encoder)
    }
}

impl<T: Decodable> Decodable for Box<T> {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        T::decode(decoder).map(Box::new)
    }
}

// --- Optional --------------------------------------------------------------

impl<T: Encodable> Encodable for Option<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.single_value_container().encode_nil(),
        }
    }
}

impl<T: Decodable> Decodable for Option<T> {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let is_nil = decoder.single_value_container()?.decode_nil();
        if is_nil {
            Ok(None)
        } else {
            T::decode(decoder).map(Some)
        }
    }
}

// --- Sequences -------------------------------------------------------------

fn encode_sequence<'a, T, I>(elements: I, encoder: &mut dyn Encoder) -> Result<(), EncodeError>
where
    T: Encodable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut container = encoder.unkeyed_container();
    for element in elements {
        container.encode(element)?;
    }
    Ok(())
}

impl<T: Encodable> Encodable for [T] {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encode_sequence(self, encoder)
    }
}

impl<T: Encodable> Encodable for Vec<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encode_sequence(self, encoder)
    }
}

impl<T: Decodable> Decodable for Vec<T> {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let mut container = decoder.unkeyed_container()?;
        let mut values = Vec::new();
        if let Some(count) = container.count() {
            values.reserve(count);
        }
        while !container.is_at_end() {
            values.push(container.decode()?);
        }
        Ok(values)
    }
}

impl<T: Encodable> Encodable for VecDeque<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encode_sequence(self, encoder)
    }
}

impl<T: Decodable> Decodable for VecDeque<T> {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        Vec::decode(decoder).map(VecDeque::from)
    }
}

impl<T: Encodable> Encodable for BTreeSet<T> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encode_sequence(self, encoder)
    }
}

impl<T: Decodable + Ord> Decodable for BTreeSet<T> {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let mut container = decoder.unkeyed_container()?;
        let mut values = BTreeSet::new();
        while !container.is_at_end() {
            values.insert(container.decode()?);
        }
        Ok(values)
    }
}

#[cfg(feature = "std")]
impl<T: Encodable, S> Encodable for HashSet<T, S> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        encode_sequence(self, encoder)
    }
}

#[cfg(feature = "std")]
impl<T, S> Decodable for HashSet<T, S>
where
    T: Decodable + Eq + Hash,
    S: BuildHasher + Default,
{
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let mut container = decoder.unkeyed_container()?;
        let mut values = HashSet::with_hasher(S::default());
        while !container.is_at_end() {
            values.insert(container.decode()?);
        }
        Ok(values)
    }
}

// --- Tuples ----------------------------------------------------------------

impl<A: Encodable, B: Encodable> Encodable for (A, B) {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let mut container = encoder.unkeyed_container();
        container.encode(&self.0)?;
        container.encode(&self.1)?;
        Ok(())
    }
}

impl<A: Decodable, B: Decodable> Decodable for (A, B) {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let mut container = decoder.unkeyed_container()?;
        let a = container.decode()?;
        let b = container.decode()?;
        Ok((a, b))
    }
}

impl<A: Encodable, B: Encodable, C: Encodable> Encodable for (A, B, C) {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let mut container = encoder.unkeyed_container();
        container.encode(&self.0)?;
        container.encode(&self.1)?;
        container.encode(&self.2)?;
        Ok(())
    }
}

impl<A: Decodable, B: Decodable, C: Decodable> Decodable for (A, B, C) {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        let mut container = decoder.unkeyed_container()?;
        let a = container.decode()?;
        let b = container.decode()?;
        let c = container.decode()?;
        Ok((a, b, c))
    }
}

// --- Map key probing -------------------------------------------------------
//
// Rust has no runtime type test to ask "is K a string or integer type", so
// key convertibility is probed through the framework itself: a map key is
// encoded into `MapKeyEncoder`, which captures a single string or integer
// scalar and swallows anything structured. The reverse direction serves a
// stored key back through `MapKeyDecoder` so `K: Decodable` can be rebuilt
// from an object key.

/// Discards everything encoded into it. Handed out by the key probe for
/// structured keys, which are by definition not coding-key-convertible.
#[derive(Default)]
struct Sink {
    path: CodingPath,
    user_info: UserInfo,
    len: usize,
}

macro_rules! sink_keyed_encode {
    ($($method:ident($ty:ty);)*) => {$(
        fn $method(&mut self, _key: &CodingKey, _value: $ty) -> Result<(), EncodeError> {
            Ok(())
        }
    )*};
}

macro_rules! sink_value_encode {
    ($($method:ident($ty:ty);)*) => {$(
        fn $method(&mut self, _value: $ty) -> Result<(), EncodeError> {
            self.len += 1;
            Ok(())
        }
    )*};
}

impl Encoder for Sink {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    fn keyed_container(&mut self) -> Box<dyn KeyedEncodingContainer + '_> {
        Box::new(Sink::default())
    }

    fn unkeyed_container(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_> {
        Box::new(Sink::default())
    }

    fn single_value_container(&mut self) -> Box<dyn SingleValueEncodingContainer + '_> {
        Box::new(Sink::default())
    }
}

impl KeyedEncodingContainer for Sink {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn encode_nil(&mut self, _key: &CodingKey) -> Result<(), EncodeError> {
        Ok(())
    }

    sink_keyed_encode! {
        encode_bool(bool);
        encode_i8(i8);
        encode_i16(i16);
        encode_i32(i32);
        encode_i64(i64);
        encode_isize(isize);
        encode_u8(u8);
        encode_u16(u16);
        encode_u32(u32);
        encode_u64(u64);
        encode_usize(usize);
        encode_f32(f32);
        encode_f64(f64);
        encode_str(&str);
    }

    fn nested_keyed(&mut self, _key: &CodingKey) -> Box<dyn KeyedEncodingContainer + '_> {
        Box::new(Sink::default())
    }

    fn nested_unkeyed(&mut self, _key: &CodingKey) -> Box<dyn UnkeyedEncodingContainer + '_> {
        Box::new(Sink::default())
    }

    fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        Box::new(Sink::default())
    }

    fn super_encoder_for(&mut self, _key: &CodingKey) -> Box<dyn Encoder + '_> {
        Box::new(Sink::default())
    }

    fn value_encoder(&mut self, _key: &CodingKey) -> Box<dyn Encoder + '_> {
        Box::new(Sink::default())
    }
}

impl UnkeyedEncodingContainer for Sink {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn count(&self) -> usize {
        self.len
    }

    fn encode_nil(&mut self) -> Result<(), EncodeError> {
        self.len += 1;
        Ok(())
    }

    sink_value_encode! {
        encode_bool(bool);
        encode_i8(i8);
        encode_i16(i16);
        encode_i32(i32);
        encode_i64(i64);
        encode_isize(isize);
        encode_u8(u8);
        encode_u16(u16);
        encode_u32(u32);
        encode_u64(u64);
        encode_usize(usize);
        encode_f32(f32);
        encode_f64(f64);
        encode_str(&str);
    }

    fn nested_keyed(&mut self) -> Box<dyn KeyedEncodingContainer + '_> {
        self.len += 1;
        Box::new(Sink::default())
    }

    fn nested_unkeyed(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_> {
        self.len += 1;
        Box::new(Sink::default())
    }

    fn super_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.len += 1;
        Box::new(Sink::default())
    }

    fn value_encoder(&mut self) -> Box<dyn Encoder + '_> {
        self.len += 1;
        Box::new(Sink::default())
    }
}

macro_rules! sink_single_encode {
    ($($method:ident($ty:ty);)*) => {$(
        fn $method(&mut self, _value: $ty) -> Result<(), EncodeError> {
            Ok(())
        }
    )*};
}

impl SingleValueEncodingContainer for Sink {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn encode_nil(&mut self) -> Result<(), EncodeError> {
        Ok(())
    }

    sink_single_encode! {
        encode_bool(bool);
        encode_i8(i8);
        encode_i16(i16);
        encode_i32(i32);
        encode_i64(i64);
        encode_isize(isize);
        encode_u8(u8);
        encode_u16(u16);
        encode_u32(u32);
        encode_u64(u64);
        encode_usize(usize);
        encode_f32(f32);
        encode_f64(f64);
        encode_str(&str);
    }

    fn value_encoder(&mut self) -> Box<dyn Encoder + '_> {
        Box::new(Sink::default())
    }
}

/// Single-purpose encoder that records whether a map key encodes as a
/// string or integer scalar, and as which [`CodingKey`].
struct MapKeyEncoder<'c> {
    captured: &'c mut Option<CodingKey>,
    path: CodingPath,
    user_info: UserInfo,
}

impl Encoder for MapKeyEncoder<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    fn keyed_container(&mut self) -> Box<dyn KeyedEncodingContainer + '_> {
        Box::new(Sink::default())
    }

    fn unkeyed_container(&mut self) -> Box<dyn UnkeyedEncodingContainer + '_> {
        Box::new(Sink::default())
    }

    fn single_value_container(&mut self) -> Box<dyn SingleValueEncodingContainer + '_> {
        Box::new(MapKeyCapture {
            captured: &mut *self.captured,
            path: self.path.clone(),
        })
    }
}

/// A coding key for an integer-valued map key: canonical decimal name, with
/// the integer form attached when it is in `usize` range.
fn int_key(value: i128) -> CodingKey {
    let key = CodingKey::new(value.to_string());
    match usize::try_from(value) {
        Ok(index) => key.with_index(index),
        Err(_) => key,
    }
}

struct MapKeyCapture<'c> {
    captured: &'c mut Option<CodingKey>,
    path: CodingPath,
}

macro_rules! capture_int_key {
    ($($method:ident($ty:ty);)*) => {$(
        fn $method(&mut self, value: $ty) -> Result<(), EncodeError> {
            *self.captured = Some(int_key(value as i128));
            Ok(())
        }
    )*};
}

macro_rules! capture_rejects {
    ($($method:ident($ty:ty);)*) => {$(
        fn $method(&mut self, _value: $ty) -> Result<(), EncodeError> {
            *self.captured = None;
            Ok(())
        }
    )*};
}

impl SingleValueEncodingContainer for MapKeyCapture<'_> {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn encode_nil(&mut self) -> Result<(), EncodeError> {
        *self.captured = None;
        Ok(())
    }

    capture_int_key! {
        encode_i8(i8);
        encode_i16(i16);
        encode_i32(i32);
        encode_i64(i64);
        encode_isize(isize);
        encode_u8(u8);
        encode_u16(u16);
        encode_u32(u32);
        encode_u64(u64);
        encode_usize(usize);
    }

    capture_rejects! {
        encode_bool(bool);
        encode_f32(f32);
        encode_f64(f64);
    }

    fn encode_str(&mut self, value: &str) -> Result<(), EncodeError> {
        *self.captured = Some(CodingKey::new(value.to_string()));
        Ok(())
    }

    fn value_encoder(&mut self) -> Box<dyn Encoder + '_> {
        // Newtype keys recurse here with the same capture slot.
        Box::new(MapKeyEncoder {
            captured: &mut *self.captured,
            path: self.path.clone(),
            user_info: UserInfo::new(),
        })
    }
}

fn probe_map_key<K: Encodable>(
    key: &K,
    path: &CodingPath,
) -> Result<Option<CodingKey>, EncodeError> {
    let mut captured = None;
    let mut probe = MapKeyEncoder {
        captured: &mut captured,
        path: path.clone(),
        user_info: UserInfo::new(),
    };
    key.encode(&mut probe)?;
    Ok(captured)
}

/// Single-purpose decoder that serves a stored [`CodingKey`] back as a
/// single string or integer value.
struct MapKeyDecoder {
    key: CodingKey,
    path: CodingPath,
    user_info: UserInfo,
}

impl Decoder for MapKeyDecoder {
    fn coding_path(&self) -> &CodingPath {
        &self.path
    }

    fn user_info(&self) -> &UserInfo {
        &self.user_info
    }

    fn keyed_container(
        &mut self,
    ) -> Result<Box<dyn KeyedDecodingContainer + '_>, DecodeError> {
        Err(self.not_a_container())
    }

    fn unkeyed_container(
        &mut self,
    ) -> Result<Box<dyn UnkeyedDecodingContainer + '_>, DecodeError> {
        Err(self.not_a_container())
    }

    fn single_value_container(
        &mut self,
    ) -> Result<Box<dyn SingleValueDecodingContainer + '_>, DecodeError> {
        Ok(Box::new(MapKeySource {
            key: &self.key,
            path: &self.path,
        }))
    }
}

impl MapKeyDecoder {
    fn not_a_container(&self) -> DecodeError {
        DecodeError::type_mismatch(
            self.path.clone(),
            "string or integer map key",
            "map keys decode from a single string or integer value",
        )
    }
}

struct MapKeySource<'a> {
    key: &'a CodingKey,
    path: &'a CodingPath,
}

macro_rules! serve_int_key {
    ($($method:ident($ty:ty);)*) => {$(
        fn $method(&self) -> Result<$ty, DecodeError> {
            self.key.name().parse::<$ty>().map_err(|_| {
                DecodeError::data_corrupted(
                    self.path.clone(),
                    format!(
                        "map key `{}` is not a valid {}",
                        self.key.name(),
                        stringify!($ty)
                    ),
                )
            })
        }
    )*};
}

macro_rules! serve_rejects {
    ($($method:ident($ty:ty) => $expected:literal;)*) => {$(
        fn $method(&self) -> Result<$ty, DecodeError> {
            Err(DecodeError::type_mismatch(
                self.path.clone(),
                $expected,
                format!("map key `{}` is not a {}", self.key.name(), $expected),
            ))
        }
    )*};
}

impl SingleValueDecodingContainer for MapKeySource<'_> {
    fn coding_path(&self) -> &CodingPath {
        self.path
    }

    fn decode_nil(&self) -> bool {
        false
    }

    serve_int_key! {
        decode_i8(i8);
        decode_i16(i16);
        decode_i32(i32);
        decode_i64(i64);
        decode_isize(isize);
        decode_u8(u8);
        decode_u16(u16);
        decode_u32(u32);
        decode_u64(u64);
        decode_usize(usize);
    }

    serve_rejects! {
        decode_bool(bool) => "boolean";
        decode_f32(f32) => "floating-point number";
        decode_f64(f64) => "floating-point number";
    }

    fn decode_string(&self) -> Result<String, DecodeError> {
        Ok(self.key.name().to_string())
    }

    fn value_decoder(&self) -> Result<Box<dyn Decoder + '_>, DecodeError> {
        Ok(Box::new(MapKeyDecoder {
            key: self.key.clone(),
            path: self.path.clone(),
            user_info: UserInfo::new(),
        }))
    }
}

fn decode_map_key<K: Decodable>(raw: &CodingKey, parent: &CodingPath) -> Result<K, DecodeError> {
    let mut decoder = MapKeyDecoder {
        key: raw.clone(),
        path: parent.child(raw),
        user_info: UserInfo::new(),
    };
    K::decode(&mut decoder)
}

// --- Maps ------------------------------------------------------------------

fn encode_map_entries<K, V>(
    entries: &[(&K, &V)],
    encoder: &mut dyn Encoder,
) -> Result<(), EncodeError>
where
    K: Encodable,
    V: Encodable,
{
    // Probe the first key; an empty map has nothing to inspect and encodes
    // as an empty keyed container.
    let scalar_keys = match entries.first() {
        Some((key, _)) => probe_map_key(*key, encoder.coding_path())?.is_some(),
        None => true,
    };

    if scalar_keys {
        let mut container = encoder.keyed_container();
        for (key, value) in entries {
            let base = container.coding_path().clone();
            let coding_key = probe_map_key(*key, &base)?.ok_or_else(|| {
                EncodeError::invalid_value(
                    base,
                    "map key does not encode as a single string or integer value",
                )
            })?;
            container.encode(&coding_key, *value)?;
        }
    } else {
        let mut container = encoder.unkeyed_container();
        for (key, value) in entries {
            container.encode(*key)?;
            container.encode(*value)?;
        }
    }
    Ok(())
}

fn decode_map_entries<K, V>(decoder: &mut dyn Decoder) -> Result<Vec<(K, V)>, DecodeError>
where
    K: Decodable,
    V: Decodable,
{
    match decoder.keyed_container() {
        Ok(container) => {
            let mut entries = Vec::new();
            for raw in container.all_keys() {
                let key = decode_map_key(&raw, container.coding_path())?;
                let value = container.decode(&raw)?;
                entries.push((key, value));
            }
            return Ok(entries);
        }
        Err(error) => {
            if !matches!(error.kind, DecodeErrorKind::TypeMismatch { .. }) {
                return Err(error);
            }
        }
    }

    // Non-scalar keys arrive as a flat sequence of alternating keys and
    // values; an odd element count is corrupted data.
    let mut container = decoder.unkeyed_container()?;
    if let Some(count) = container.count()
        && count % 2 != 0
    {
        return Err(DecodeError::data_corrupted(
            container.coding_path().clone(),
            format!("expected key/value pairs, found {count} elements"),
        ));
    }
    let mut entries = Vec::new();
    while !container.is_at_end() {
        let key: K = container.decode()?;
        if container.is_at_end() {
            return Err(DecodeError::data_corrupted(
                container.coding_path().clone(),
                "unkeyed container reached the end before the value for a key was decoded",
            ));
        }
        let value: V = container.decode()?;
        entries.push((key, value));
    }
    Ok(entries)
}

impl<K: Encodable, V: Encodable> Encodable for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let entries: Vec<(&K, &V)> = self.iter().collect();
        encode_map_entries(&entries, encoder)
    }
}

impl<K: Decodable + Ord, V: Decodable> Decodable for BTreeMap<K, V> {
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        Ok(decode_map_entries(decoder)?.into_iter().collect())
    }
}

#[cfg(feature = "std")]
impl<K: Encodable, V: Encodable, S> Encodable for HashMap<K, V, S> {
    fn encode(&self, encoder: &mut dyn Encoder) -> Result<(), EncodeError> {
        let entries: Vec<(&K, &V)> = self.iter().collect();
        encode_map_entries(&entries, encoder)
    }
}

#[cfg(feature = "std")]
impl<K, V, S> Decodable for HashMap<K, V, S>
where
    K: Decodable + Eq + Hash,
    V: Decodable,
    S: BuildHasher + Default,
{
    fn decode(decoder: &mut dyn Decoder) -> Result<Self, DecodeError> {
        Ok(decode_map_entries(decoder)?.into_iter().collect())
    }
}
