//! Generic list conversion.

use crate::converter::Converter;
use crate::engine::Engine;
use crate::ops::mismatch;
use crate::types::{HostValue, Result, Sexp};

/// Convert each item through the strict path and collect the handles into a
/// generic vector. Any item without a conversion fails the whole list.
pub(crate) fn convert_all<E, I>(conv: &mut Converter<E>, items: I) -> Result<Sexp>
where
    E: Engine,
    I: IntoIterator<Item = HostValue>,
{
    let elements = items
        .into_iter()
        .map(|item| conv.convert_or_fail(&item))
        .collect::<Result<Vec<_>>>()?;
    conv.engine_mut().generic_vector(&elements)
}

pub fn convert_list<E: Engine>(conv: &mut Converter<E>, value: &HostValue) -> Result<Option<Sexp>> {
    match value {
        HostValue::List(items) => convert_all(conv, items.iter().cloned()).map(Some),
        other => Err(mismatch(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HostObject, SexpKind};
    use crate::MemoryEngine;

    #[test]
    fn mixed_list() {
        let mut conv = Converter::new(MemoryEngine::new());
        let value = HostValue::List(vec![
            HostValue::from(1.0),
            HostValue::from("a"),
            HostValue::from(vec![1, 2]),
        ]);
        let list = convert_list(&mut conv, &value).unwrap().unwrap();
        assert_eq!(list.kind(), SexpKind::List);

        let engine = conv.engine();
        let elements = engine.as_list(list.ptr()).unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(engine.as_real(elements[0]).unwrap(), &[1.0]);
        assert_eq!(engine.as_character(elements[1]).unwrap(), &["a"]);
        assert_eq!(engine.as_integer(elements[2]).unwrap(), &[1, 2]);
    }

    #[test]
    fn element_handles_are_retained() {
        let mut conv = Converter::new(MemoryEngine::new());
        let value = HostValue::List(vec![HostValue::from(1.0), HostValue::from(2.0)]);
        convert_list(&mut conv, &value).unwrap().unwrap();
        assert_eq!(conv.arena().len(), 2);
    }

    #[test]
    fn null_element_fails() {
        let mut conv = Converter::new(MemoryEngine::new());
        let value = HostValue::List(vec![HostValue::from(1.0), HostValue::Null]);
        let err = convert_list(&mut conv, &value).unwrap_err();
        assert_eq!(err.error_type(), "null_argument");
    }

    #[test]
    fn unconvertible_element_fails() {
        struct Opaque;
        let mut conv = Converter::new(MemoryEngine::new());
        let value = HostValue::List(vec![HostValue::from(HostObject::new(Opaque))]);
        let err = convert_list(&mut conv, &value).unwrap_err();
        assert_eq!(err.error_type(), "unsupported_type");
    }

    #[test]
    fn nested_lists() {
        let mut conv = Converter::new(MemoryEngine::new());
        let inner = HostValue::List(vec![HostValue::from(1)]);
        let value = HostValue::List(vec![inner, HostValue::List(vec![])]);
        let list = convert_list(&mut conv, &value).unwrap().unwrap();
        let engine = conv.engine();
        let elements = engine.as_list(list.ptr()).unwrap();
        assert_eq!(engine.as_list(elements[0]).unwrap().len(), 1);
        assert!(engine.as_list(elements[1]).unwrap().is_empty());
    }
}
