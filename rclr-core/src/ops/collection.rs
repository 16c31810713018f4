//! Keyed-collection converters.
//!
//! Keys become the `names` attribute. Names and values are both taken in the
//! collection's iteration order, so position `i` of `names` always labels
//! element `i`.

use crate::converter::Converter;
use crate::engine::Engine;
use crate::helpers::attrs;
use crate::ops::{list, mismatch};
use crate::types::{ConvertError, HostValue, Outcome, Result, Sexp, TypeKey};

/// `map<string, T>`: the values go through the registered `T[]` converter, get
/// their names, and are coerced to a list.
pub fn convert_keyed<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    let HostValue::Keyed(keyed) = value else {
        return Err(mismatch(value));
    };
    let element = keyed.element_type();
    let Some(convert_values) = conv.registry().lookup(&TypeKey::Vector(element)) else {
        return Err(ConvertError::UnsupportedCollection {
            type_name: TypeKey::Keyed(element).to_string(),
        });
    };

    let (keys, values) = keyed.split();
    let sexp = match conv.run(convert_values, &HostValue::Vector(values))? {
        Outcome::Converted(sexp) => sexp,
        Outcome::Declined | Outcome::NoConverter => return Ok(None),
    };
    attrs::set_names(conv.engine_mut(), sexp, &keys)?;
    conv.engine_mut().coerce_to_list(sexp).map(Some)
}

/// `map<string, T[]>`: a named list of vectors, one per key, whatever the
/// array lengths.
///
/// The registered `T[][]` entry only gates which element types are accepted.
/// It is never called: running it would turn equal-length arrays into a matrix
/// and lose the per-key elements. Each array goes through the strict path, so
/// the `T[]` converters decide what the elements look like.
pub fn convert_keyed_array<E: Engine>(
    conv: &mut Converter<E>,
    value: &HostValue,
) -> Result<Option<Sexp>> {
    let HostValue::KeyedArray(keyed) = value else {
        return Err(mismatch(value));
    };
    let element = keyed.element_type();
    if !conv.registry().contains(&TypeKey::Jagged(element)) {
        return Err(ConvertError::UnsupportedCollection {
            type_name: TypeKey::KeyedArray(element).to_string(),
        });
    }
    if !conv.convert_vectors() {
        return Ok(None);
    }

    let (keys, values) = keyed.split();
    let sexp = list::convert_all(conv, values)?;
    attrs::set_names(conv.engine_mut(), sexp, &keys)?;
    Ok(Some(sexp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementType, SexpKind};
    use crate::MemoryEngine;
    use indexmap::IndexMap;
    use jiff::Timestamp;

    fn converter() -> Converter<MemoryEngine> {
        Converter::new(MemoryEngine::new())
    }

    fn map<T>(entries: &[(&str, T)]) -> IndexMap<String, T>
    where
        T: Clone,
    {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn doubles_become_a_named_list_in_order() {
        let mut conv = converter();
        let value = HostValue::from(map(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]));
        let sexp = convert_keyed(&mut conv, &value).unwrap().unwrap();
        assert_eq!(sexp.kind(), SexpKind::List);

        let engine = conv.engine();
        assert_eq!(engine.attribute_strings(sexp.ptr(), "names").unwrap(), &["a", "b", "c"]);
        let elements = engine.as_list(sexp.ptr()).unwrap();
        let values: Vec<f64> = elements
            .iter()
            .map(|p| engine.as_real(*p).unwrap()[0])
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn insertion_order_not_sorted_order() {
        let mut conv = converter();
        let value = HostValue::from(map(&[("zeta", 1), ("alpha", 2)]));
        let sexp = convert_keyed(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        assert_eq!(engine.attribute_strings(sexp.ptr(), "names").unwrap(), &["zeta", "alpha"]);
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(engine.as_integer(elements[0]).unwrap(), &[1]);
    }

    #[test]
    fn timestamp_elements_stay_posixct() {
        let mut conv = converter();
        let value = HostValue::from(map(&[("start", Timestamp::UNIX_EPOCH)]));
        let sexp = convert_keyed(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(engine.as_real(elements[0]).unwrap(), &[0.0]);
        assert_eq!(
            engine.attribute_strings(elements[0], "class").unwrap(),
            &["POSIXct", "POSIXt"]
        );
        assert_eq!(engine.attribute_strings(elements[0], "tzone").unwrap(), &["UTC"]);
        assert!(engine.attribute(sexp.ptr(), "class").is_none());
    }

    #[test]
    fn single_values_are_widened() {
        let mut conv = converter();
        let value = HostValue::from(map(&[("x", 1.5f32), ("y", 0.1f32)]));
        let sexp = convert_keyed(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        assert_eq!(engine.attribute_strings(sexp.ptr(), "names").unwrap(), &["x", "y"]);
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(engine.get(elements[1]).unwrap().kind(), SexpKind::Numeric);
        assert_eq!(engine.as_real(elements[0]).unwrap(), &[1.5]);
        assert_eq!(engine.as_real(elements[1]).unwrap(), &[f64::from(0.1f32)]);
    }

    #[test]
    fn value_type_without_array_converter_is_unsupported() {
        let mut conv = converter();
        conv.registry_mut()
            .register(TypeKey::Keyed(ElementType::Logical), convert_keyed);
        let value = HostValue::from(map(&[("flag", true)]));
        let err = convert_keyed(&mut conv, &value).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnsupportedCollection {
                type_name: "map<string, bool>".into()
            }
        );
    }

    #[test]
    fn declined_values_decline_the_collection() {
        let mut conv = converter();
        conv.set_convert_vectors(false);
        let value = HostValue::from(map(&[("a", 1.0)]));
        assert!(convert_keyed(&mut conv, &value).unwrap().is_none());
    }

    #[test]
    fn arrays_become_a_named_list_of_vectors() {
        let mut conv = converter();
        let value = HostValue::from(map(&[("x", vec![1.0, 2.0]), ("y", vec![3.0])]));
        let sexp = convert_keyed_array(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        assert_eq!(engine.attribute_strings(sexp.ptr(), "names").unwrap(), &["x", "y"]);
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(engine.as_real(elements[0]).unwrap(), &[1.0, 2.0]);
        assert_eq!(engine.as_real(elements[1]).unwrap(), &[3.0]);
    }

    #[test]
    fn equal_length_arrays_stay_a_list() {
        let mut conv = converter();
        let value = HostValue::from(map(&[("x", vec![1, 2]), ("y", vec![3, 4])]));
        let sexp = convert_keyed_array(&mut conv, &value).unwrap().unwrap();
        assert_eq!(sexp.kind(), SexpKind::List);
        assert_eq!(conv.engine().as_list(sexp.ptr()).unwrap().len(), 2);
    }

    fn jagged_marker(conv: &mut Converter<MemoryEngine>, _: &HostValue) -> Result<Option<Sexp>> {
        conv.engine_mut().character_vector(&["jagged".to_string()]).map(Some)
    }

    fn vector_marker(conv: &mut Converter<MemoryEngine>, _: &HostValue) -> Result<Option<Sexp>> {
        conv.engine_mut().character_vector(&["vector".to_string()]).map(Some)
    }

    #[test]
    fn jagged_entry_gates_but_does_not_convert() {
        let value = HostValue::from(map(&[("x", vec![1, 2]), ("y", vec![3, 4])]));

        let mut conv = converter();
        conv.registry_mut()
            .register(TypeKey::Jagged(ElementType::Integer), jagged_marker);
        let sexp = convert_keyed_array(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(engine.as_integer(elements[0]).unwrap(), &[1, 2]);
        assert_eq!(engine.as_integer(elements[1]).unwrap(), &[3, 4]);

        conv.registry_mut()
            .unregister(&TypeKey::Jagged(ElementType::Integer));
        let err = convert_keyed_array(&mut conv, &value).unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnsupportedCollection {
                type_name: "map<string, int[]>".into()
            }
        );
    }

    #[test]
    fn vector_converters_shape_array_elements() {
        let mut conv = converter();
        conv.registry_mut()
            .register(TypeKey::Vector(ElementType::Integer), vector_marker);
        let value = HostValue::from(map(&[("x", vec![1, 2])]));
        let sexp = convert_keyed_array(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        let elements = engine.as_list(sexp.ptr()).unwrap();
        assert_eq!(engine.as_character(elements[0]).unwrap(), &["vector"]);
    }

    #[test]
    fn timestamp_arrays_have_no_jagged_converter() {
        let mut conv = converter();
        let value = HostValue::from(map(&[("t", vec![Timestamp::UNIX_EPOCH])]));
        let err = convert_keyed_array(&mut conv, &value).unwrap_err();
        assert_eq!(err.error_type(), "unsupported_collection");
        assert!(err.to_string().contains("map<string, timestamp[]>"));
    }
}
