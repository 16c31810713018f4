//! Exact-type dispatch table.

use std::collections::HashMap;
use std::fmt;

use crate::converter::Converter;
use crate::engine::Engine;
use crate::ops::{collection, list, matrix, scalar, vector};
use crate::types::{ElementType, HostValue, Result, Sexp, TypeKey};

/// A converter for one exact host type.
///
/// Returns `Ok(None)` when a feature flag switches the conversion off.
pub type ConvertFn<E> = fn(&mut Converter<E>, &HostValue) -> Result<Option<Sexp>>;

/// Maps a [`TypeKey`] to its converter. Lookup is by equality only: a value whose
/// key is not registered has no converter, whatever it resembles.
pub struct Registry<E: Engine> {
    converters: HashMap<TypeKey, ConvertFn<E>>,
}

impl<E: Engine> Registry<E> {
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// The built-in converter set.
    ///
    /// Logical scalars and vectors have converters ([`scalar::convert_logical`],
    /// [`vector::convert_logical`]) that are deliberately left out, so `bool`
    /// values pass through unless a caller registers them.
    pub fn standard() -> Self {
        use ElementType::*;

        let mut registry = Self::empty();

        registry.register(TypeKey::Scalar(Single), scalar::convert_single);
        registry.register(TypeKey::Scalar(Double), scalar::convert_double);
        registry.register(TypeKey::Scalar(Integer), scalar::convert_integer);
        registry.register(TypeKey::Scalar(Character), scalar::convert_character);
        registry.register(TypeKey::Scalar(Timestamp), scalar::convert_timestamp);
        registry.register(TypeKey::Scalar(Duration), scalar::convert_duration);

        registry.register(TypeKey::Vector(Single), vector::convert_single);
        registry.register(TypeKey::Vector(Double), vector::convert_double);
        registry.register(TypeKey::Vector(Integer), vector::convert_integer);
        registry.register(TypeKey::Vector(Character), vector::convert_character);
        registry.register(TypeKey::Vector(Timestamp), vector::convert_timestamp);
        registry.register(TypeKey::Vector(Duration), vector::convert_duration);

        registry.register(TypeKey::Matrix(Single), matrix::convert_single);
        registry.register(TypeKey::Matrix(Double), matrix::convert_double);
        registry.register(TypeKey::Matrix(Integer), matrix::convert_integer);
        registry.register(TypeKey::Matrix(Character), matrix::convert_character);

        registry.register(TypeKey::Jagged(Single), matrix::convert_jagged_single);
        registry.register(TypeKey::Jagged(Double), matrix::convert_jagged_double);
        registry.register(TypeKey::Jagged(Integer), matrix::convert_jagged_integer);
        registry.register(TypeKey::Jagged(Character), matrix::convert_jagged_character);

        for element in [Double, Single, Character, Integer, Timestamp] {
            registry.register(TypeKey::Keyed(element), collection::convert_keyed);
            registry.register(TypeKey::KeyedArray(element), collection::convert_keyed_array);
        }

        registry.register(TypeKey::List, list::convert_list);

        registry
    }

    /// Add or replace the converter for `key`. Returns the one it replaced.
    pub fn register(&mut self, key: TypeKey, convert: ConvertFn<E>) -> Option<ConvertFn<E>> {
        self.converters.insert(key, convert)
    }

    pub fn unregister(&mut self, key: &TypeKey) -> Option<ConvertFn<E>> {
        self.converters.remove(key)
    }

    pub fn lookup(&self, key: &TypeKey) -> Option<ConvertFn<E>> {
        self.converters.get(key).copied()
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.converters.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.converters.keys()
    }
}

impl<E: Engine> Default for Registry<E> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<E: Engine> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.converters.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("Registry").field("keys", &keys).finish()
    }
}
