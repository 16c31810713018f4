//! Host values and the exact type keys they dispatch on.
//!
//! A [`HostValue`] is one of a closed set of shapes (scalar, vector, matrix,
//! jagged, keyed collection, list) over a closed set of element types. Its
//! [`TypeKey`] is what the [`Registry`](crate::Registry) is indexed by.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use jiff::{SignedDuration, Timestamp};

use crate::types::matrix::Matrix;
use crate::types::sexp::Sexp;

/// Element type of a host scalar or array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Logical,
    Double,
    /// Single-precision float; always widened to double before reaching R.
    Single,
    Integer,
    Character,
    /// Absolute instant, converted to `POSIXct`.
    Timestamp,
    /// Elapsed time, converted to `difftime` in seconds.
    Duration,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Logical => "bool",
            ElementType::Double => "double",
            ElementType::Single => "float",
            ElementType::Integer => "int",
            ElementType::Character => "string",
            ElementType::Timestamp => "timestamp",
            ElementType::Duration => "duration",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact runtime type of a host value. Two values dispatch to the same
/// converter only if their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Scalar(ElementType),
    Vector(ElementType),
    Matrix(ElementType),
    Jagged(ElementType),
    /// Ordered string-keyed map of scalars.
    Keyed(ElementType),
    /// Ordered string-keyed map of arrays.
    KeyedArray(ElementType),
    List,
    Object(ObjectType),
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Scalar(e) => write!(f, "{e}"),
            TypeKey::Vector(e) => write!(f, "{e}[]"),
            TypeKey::Matrix(e) => write!(f, "{e}[,]"),
            TypeKey::Jagged(e) => write!(f, "{e}[][]"),
            TypeKey::Keyed(e) => write!(f, "map<string, {e}>"),
            TypeKey::KeyedArray(e) => write!(f, "map<string, {e}[]>"),
            TypeKey::List => f.write_str("list"),
            TypeKey::Object(ty) => f.write_str(ty.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Logical(bool),
    Double(f64),
    Single(f32),
    Integer(i32),
    Character(String),
    Timestamp(Timestamp),
    Duration(SignedDuration),
}

impl Scalar {
    pub fn element_type(&self) -> ElementType {
        match self {
            Scalar::Logical(_) => ElementType::Logical,
            Scalar::Double(_) => ElementType::Double,
            Scalar::Single(_) => ElementType::Single,
            Scalar::Integer(_) => ElementType::Integer,
            Scalar::Character(_) => ElementType::Character,
            Scalar::Timestamp(_) => ElementType::Timestamp,
            Scalar::Duration(_) => ElementType::Duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Logical(Vec<bool>),
    Double(Vec<f64>),
    Single(Vec<f32>),
    Integer(Vec<i32>),
    Character(Vec<String>),
    Timestamp(Vec<Timestamp>),
    Duration(Vec<SignedDuration>),
}

impl Vector {
    pub fn element_type(&self) -> ElementType {
        match self {
            Vector::Logical(_) => ElementType::Logical,
            Vector::Double(_) => ElementType::Double,
            Vector::Single(_) => ElementType::Single,
            Vector::Integer(_) => ElementType::Integer,
            Vector::Character(_) => ElementType::Character,
            Vector::Timestamp(_) => ElementType::Timestamp,
            Vector::Duration(_) => ElementType::Duration,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Logical(v) => v.len(),
            Vector::Double(v) => v.len(),
            Vector::Single(v) => v.len(),
            Vector::Integer(v) => v.len(),
            Vector::Character(v) => v.len(),
            Vector::Timestamp(v) => v.len(),
            Vector::Duration(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A rectangular matrix of one of the element types R has a matrix constructor for.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixValue {
    Double(Matrix<f64>),
    Single(Matrix<f32>),
    Integer(Matrix<i32>),
    Character(Matrix<String>),
}

impl MatrixValue {
    pub fn element_type(&self) -> ElementType {
        match self {
            MatrixValue::Double(_) => ElementType::Double,
            MatrixValue::Single(_) => ElementType::Single,
            MatrixValue::Integer(_) => ElementType::Integer,
            MatrixValue::Character(_) => ElementType::Character,
        }
    }
}

/// An array of arrays. Rows may differ in length.
#[derive(Debug, Clone, PartialEq)]
pub enum Jagged {
    Double(Vec<Vec<f64>>),
    Single(Vec<Vec<f32>>),
    Integer(Vec<Vec<i32>>),
    Character(Vec<Vec<String>>),
    Timestamp(Vec<Vec<Timestamp>>),
}

impl Jagged {
    pub fn element_type(&self) -> ElementType {
        match self {
            Jagged::Double(_) => ElementType::Double,
            Jagged::Single(_) => ElementType::Single,
            Jagged::Integer(_) => ElementType::Integer,
            Jagged::Character(_) => ElementType::Character,
            Jagged::Timestamp(_) => ElementType::Timestamp,
        }
    }
}

/// Ordered string-keyed collection of scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Keyed {
    Logical(IndexMap<String, bool>),
    Double(IndexMap<String, f64>),
    Single(IndexMap<String, f32>),
    Integer(IndexMap<String, i32>),
    Character(IndexMap<String, String>),
    Timestamp(IndexMap<String, Timestamp>),
    Duration(IndexMap<String, SignedDuration>),
}

fn split_map<T: Clone>(map: &IndexMap<String, T>) -> (Vec<String>, Vec<T>) {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).unzip()
}

impl Keyed {
    pub fn element_type(&self) -> ElementType {
        match self {
            Keyed::Logical(_) => ElementType::Logical,
            Keyed::Double(_) => ElementType::Double,
            Keyed::Single(_) => ElementType::Single,
            Keyed::Integer(_) => ElementType::Integer,
            Keyed::Character(_) => ElementType::Character,
            Keyed::Timestamp(_) => ElementType::Timestamp,
            Keyed::Duration(_) => ElementType::Duration,
        }
    }

    /// Keys and values, both in iteration order.
    pub fn split(&self) -> (Vec<String>, Vector) {
        match self {
            Keyed::Logical(m) => {
                let (k, v) = split_map(m);
                (k, Vector::Logical(v))
            }
            Keyed::Double(m) => {
                let (k, v) = split_map(m);
                (k, Vector::Double(v))
            }
            Keyed::Single(m) => {
                let (k, v) = split_map(m);
                (k, Vector::Single(v))
            }
            Keyed::Integer(m) => {
                let (k, v) = split_map(m);
                (k, Vector::Integer(v))
            }
            Keyed::Character(m) => {
                let (k, v) = split_map(m);
                (k, Vector::Character(v))
            }
            Keyed::Timestamp(m) => {
                let (k, v) = split_map(m);
                (k, Vector::Timestamp(v))
            }
            Keyed::Duration(m) => {
                let (k, v) = split_map(m);
                (k, Vector::Duration(v))
            }
        }
    }
}

/// Ordered string-keyed collection of arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyedArray {
    Double(IndexMap<String, Vec<f64>>),
    Single(IndexMap<String, Vec<f32>>),
    Integer(IndexMap<String, Vec<i32>>),
    Character(IndexMap<String, Vec<String>>),
    Timestamp(IndexMap<String, Vec<Timestamp>>),
}

impl KeyedArray {
    pub fn element_type(&self) -> ElementType {
        match self {
            KeyedArray::Double(_) => ElementType::Double,
            KeyedArray::Single(_) => ElementType::Single,
            KeyedArray::Integer(_) => ElementType::Integer,
            KeyedArray::Character(_) => ElementType::Character,
            KeyedArray::Timestamp(_) => ElementType::Timestamp,
        }
    }

    /// Keys and one host vector per key, both in iteration order.
    pub fn split(&self) -> (Vec<String>, Vec<HostValue>) {
        fn go<T: Clone>(
            map: &IndexMap<String, Vec<T>>,
            wrap: fn(Vec<T>) -> Vector,
        ) -> (Vec<String>, Vec<HostValue>) {
            map.iter()
                .map(|(k, v)| (k.clone(), HostValue::Vector(wrap(v.clone()))))
                .unzip()
        }
        match self {
            KeyedArray::Double(m) => go(m, Vector::Double),
            KeyedArray::Single(m) => go(m, Vector::Single),
            KeyedArray::Integer(m) => go(m, Vector::Integer),
            KeyedArray::Character(m) => go(m, Vector::Character),
            KeyedArray::Timestamp(m) => go(m, Vector::Timestamp),
        }
    }
}

/// Runtime identity of a host object's Rust type.
///
/// Equality and hashing use the [`TypeId`] only. Type names are not unique, so
/// the name is kept for messages and never compared.
#[derive(Debug, Clone, Copy)]
pub struct ObjectType {
    id: TypeId,
    name: &'static str,
}

impl ObjectType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectType {}

impl Hash for ObjectType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A host object with no R representation.
///
/// Its type key is its exact Rust type, which no converter is registered for
/// unless a caller adds one.
#[derive(Clone)]
pub struct HostObject {
    object_type: ObjectType,
    value: Arc<dyn Any + Send + Sync>,
}

impl HostObject {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            object_type: ObjectType::of::<T>(),
            value: Arc::new(value),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn type_name(&self) -> &'static str {
        self.object_type.name()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("type_name", &self.type_name())
            .finish_non_exhaustive()
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

/// A value submitted for conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Null,
    Scalar(Scalar),
    Vector(Vector),
    Matrix(MatrixValue),
    Jagged(Jagged),
    Keyed(Keyed),
    KeyedArray(KeyedArray),
    /// Heterogeneous sequence, converted element by element.
    List(Vec<HostValue>),
    Object(HostObject),
    /// A value that already lives in the interpreter.
    Sexp(Sexp),
}

impl HostValue {
    /// Exact dispatch key. `None` for `Null` and `Sexp`, which the facade
    /// handles before any lookup.
    pub fn type_key(&self) -> Option<TypeKey> {
        let key = match self {
            HostValue::Null | HostValue::Sexp(_) => return None,
            HostValue::Scalar(s) => TypeKey::Scalar(s.element_type()),
            HostValue::Vector(v) => TypeKey::Vector(v.element_type()),
            HostValue::Matrix(m) => TypeKey::Matrix(m.element_type()),
            HostValue::Jagged(j) => TypeKey::Jagged(j.element_type()),
            HostValue::Keyed(k) => TypeKey::Keyed(k.element_type()),
            HostValue::KeyedArray(k) => TypeKey::KeyedArray(k.element_type()),
            HostValue::List(_) => TypeKey::List,
            HostValue::Object(o) => TypeKey::Object(o.object_type()),
        };
        Some(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> String {
        match self {
            HostValue::Null => "null".to_string(),
            HostValue::Sexp(s) => format!("sexp<{}>", s.kind().type_name()),
            other => other
                .type_key()
                .map(|k| k.to_string())
                .unwrap_or_default(),
        }
    }
}

macro_rules! impl_from_host {
    ($ty:ty => $shape:ident :: $variant:ident) => {
        impl From<$ty> for HostValue {
            fn from(value: $ty) -> Self {
                HostValue::$shape($shape::$variant(value))
            }
        }
    };
}

impl_from_host!(bool => Scalar::Logical);
impl_from_host!(f64 => Scalar::Double);
impl_from_host!(f32 => Scalar::Single);
impl_from_host!(i32 => Scalar::Integer);
impl_from_host!(String => Scalar::Character);
impl_from_host!(Timestamp => Scalar::Timestamp);
impl_from_host!(SignedDuration => Scalar::Duration);

impl_from_host!(Vec<bool> => Vector::Logical);
impl_from_host!(Vec<f64> => Vector::Double);
impl_from_host!(Vec<f32> => Vector::Single);
impl_from_host!(Vec<i32> => Vector::Integer);
impl_from_host!(Vec<String> => Vector::Character);
impl_from_host!(Vec<Timestamp> => Vector::Timestamp);
impl_from_host!(Vec<SignedDuration> => Vector::Duration);

impl_from_host!(Vec<Vec<f64>> => Jagged::Double);
impl_from_host!(Vec<Vec<f32>> => Jagged::Single);
impl_from_host!(Vec<Vec<i32>> => Jagged::Integer);
impl_from_host!(Vec<Vec<String>> => Jagged::Character);
impl_from_host!(Vec<Vec<Timestamp>> => Jagged::Timestamp);

impl_from_host!(IndexMap<String, bool> => Keyed::Logical);
impl_from_host!(IndexMap<String, f64> => Keyed::Double);
impl_from_host!(IndexMap<String, f32> => Keyed::Single);
impl_from_host!(IndexMap<String, i32> => Keyed::Integer);
impl_from_host!(IndexMap<String, String> => Keyed::Character);
impl_from_host!(IndexMap<String, Timestamp> => Keyed::Timestamp);
impl_from_host!(IndexMap<String, SignedDuration> => Keyed::Duration);

impl_from_host!(IndexMap<String, Vec<f64>> => KeyedArray::Double);
impl_from_host!(IndexMap<String, Vec<f32>> => KeyedArray::Single);
impl_from_host!(IndexMap<String, Vec<i32>> => KeyedArray::Integer);
impl_from_host!(IndexMap<String, Vec<String>> => KeyedArray::Character);
impl_from_host!(IndexMap<String, Vec<Timestamp>> => KeyedArray::Timestamp);

impl From<Matrix<f64>> for HostValue {
    fn from(value: Matrix<f64>) -> Self {
        HostValue::Matrix(MatrixValue::Double(value))
    }
}

impl From<Matrix<f32>> for HostValue {
    fn from(value: Matrix<f32>) -> Self {
        HostValue::Matrix(MatrixValue::Single(value))
    }
}

impl From<Matrix<i32>> for HostValue {
    fn from(value: Matrix<i32>) -> Self {
        HostValue::Matrix(MatrixValue::Integer(value))
    }
}

impl From<Matrix<String>> for HostValue {
    fn from(value: Matrix<String>) -> Self {
        HostValue::Matrix(MatrixValue::Character(value))
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Scalar(Scalar::Character(value.to_string()))
    }
}

impl From<Vec<&str>> for HostValue {
    fn from(value: Vec<&str>) -> Self {
        HostValue::Vector(Vector::Character(
            value.into_iter().map(str::to_string).collect(),
        ))
    }
}

impl From<Sexp> for HostValue {
    fn from(value: Sexp) -> Self {
        HostValue::Sexp(value)
    }
}

impl From<HostObject> for HostValue {
    fn from(value: HostObject) -> Self {
        HostValue::Object(value)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HostValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_keys_follow_shape_and_element() {
        assert_eq!(
            HostValue::from(1.0f64).type_key(),
            Some(TypeKey::Scalar(ElementType::Double))
        );
        assert_eq!(
            HostValue::from(vec![1i32, 2]).type_key(),
            Some(TypeKey::Vector(ElementType::Integer))
        );
        assert_eq!(
            HostValue::from(vec![vec![1.0f32]]).type_key(),
            Some(TypeKey::Jagged(ElementType::Single))
        );
        assert_eq!(HostValue::Null.type_key(), None);
    }

    #[test]
    fn type_key_display() {
        assert_eq!(TypeKey::Matrix(ElementType::Double).to_string(), "double[,]");
        assert_eq!(TypeKey::Jagged(ElementType::Integer).to_string(), "int[][]");
        assert_eq!(
            TypeKey::KeyedArray(ElementType::Timestamp).to_string(),
            "map<string, timestamp[]>"
        );
        assert_eq!(TypeKey::Keyed(ElementType::Character).to_string(), "map<string, string>");
    }

    #[test]
    fn keyed_split_keeps_iteration_order() {
        let mut map = IndexMap::new();
        map.insert("z".to_string(), 1.0);
        map.insert("a".to_string(), 2.0);
        map.insert("m".to_string(), 3.0);
        let (keys, values) = Keyed::Double(map).split();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(values, Vector::Double(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn object_key_is_the_exact_rust_type() {
        struct Widget;
        let obj = HostObject::new(Widget);
        let value = HostValue::from(obj.clone());
        assert_eq!(value.type_key(), Some(TypeKey::Object(ObjectType::of::<Widget>())));
        assert!(obj.type_name().ends_with("Widget"));
        assert_eq!(TypeKey::Object(obj.object_type()).to_string(), obj.type_name());
        assert_eq!(value, HostValue::Object(obj));
    }

    #[test]
    fn same_named_types_get_distinct_keys() {
        let first = {
            struct Opaque;
            HostObject::new(Opaque)
        };
        let second = {
            struct Opaque;
            HostObject::new(Opaque)
        };
        assert_eq!(first.type_name(), second.type_name());
        assert_ne!(first.object_type(), second.object_type());
        assert_ne!(
            HostValue::from(first).type_key(),
            HostValue::from(second).type_key()
        );
    }

    #[test]
    fn none_becomes_null() {
        let value: HostValue = Option::<f64>::None.into();
        assert!(value.is_null());
    }
}
