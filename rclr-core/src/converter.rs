//! The conversion facade.
//!
//! [`Converter::convert_to_r`] is the lenient entry point host call sites use:
//! values with no known conversion come back unchanged. [`Converter::convert_or_fail`]
//! is the strict path composite converters use for their elements, where a
//! pass-through would leave a malformed composite behind.

use crate::engine::Engine;
use crate::helpers::arena::RetentionArena;
use crate::ops::registry::{ConvertFn, Registry};
use crate::types::{Conversion, ConvertError, ConverterConfig, HostValue, Outcome, Result, Sexp};

#[derive(Debug)]
pub struct Converter<E: Engine> {
    engine: E,
    config: ConverterConfig,
    registry: Registry<E>,
    arena: RetentionArena,
}

impl<E: Engine> Converter<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, ConverterConfig::default())
    }

    pub fn with_config(engine: E, config: ConverterConfig) -> Self {
        Self::with_registry(engine, config, Registry::standard())
    }

    pub fn with_registry(engine: E, config: ConverterConfig, registry: Registry<E>) -> Self {
        Self {
            engine,
            config,
            registry,
            arena: RetentionArena::new(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn config(&self) -> ConverterConfig {
        self.config
    }

    pub fn set_config(&mut self, config: ConverterConfig) {
        self.config = config;
    }

    pub fn convert_vectors(&self) -> bool {
        self.config.convert_vectors
    }

    pub fn set_convert_vectors(&mut self, enabled: bool) {
        self.config.convert_vectors = enabled;
    }

    pub fn convert_value_types(&self) -> bool {
        self.config.convert_value_types
    }

    pub fn set_convert_value_types(&mut self, enabled: bool) {
        self.config.convert_value_types = enabled;
    }

    pub fn registry(&self) -> &Registry<E> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<E> {
        &mut self.registry
    }

    pub fn arena(&self) -> &RetentionArena {
        &self.arena
    }

    /// Convert `value` for an interpreter call.
    ///
    /// Clears the retention arena first, every time. Null yields
    /// [`Conversion::Null`]; an existing handle is retained and passed through;
    /// anything without a converter (or whose converter is switched off) is
    /// returned as [`Conversion::Unchanged`].
    pub fn convert_to_r(&mut self, value: HostValue) -> Result<Conversion> {
        self.arena.reset(&mut self.engine);

        if let HostValue::Sexp(sexp) = value {
            self.arena.retain(&mut self.engine, sexp);
            return Ok(Conversion::Foreign(sexp.ptr()));
        }
        if value.is_null() {
            return Ok(Conversion::Null);
        }

        match self.dispatch(&value)? {
            Outcome::Converted(sexp) => Ok(Conversion::Foreign(sexp.ptr())),
            Outcome::Declined | Outcome::NoConverter => {
                log::debug!("returning {} unchanged", value.type_name());
                Ok(Conversion::Unchanged(value))
            }
        }
    }

    /// Convert `value` or fail. Used for the elements of composite values.
    pub fn convert_or_fail(&mut self, value: &HostValue) -> Result<Sexp> {
        match value {
            HostValue::Null => Err(ConvertError::NullArgument),
            HostValue::Sexp(sexp) => {
                self.arena.retain(&mut self.engine, *sexp);
                Ok(*sexp)
            }
            _ => self
                .dispatch(value)?
                .converted()
                .ok_or_else(|| ConvertError::unsupported(value.type_name())),
        }
    }

    /// Look up the exact type of `value` and run its converter.
    pub fn dispatch(&mut self, value: &HostValue) -> Result<Outcome> {
        let Some(key) = value.type_key() else {
            return Ok(Outcome::NoConverter);
        };
        match self.registry.lookup(&key) {
            Some(convert) => {
                log::debug!("converting {key}");
                self.run(convert, value)
            }
            None => {
                log::debug!("no converter registered for {key}");
                Ok(Outcome::NoConverter)
            }
        }
    }

    /// Run `convert` and retain whatever it produces.
    pub(crate) fn run(&mut self, convert: ConvertFn<E>, value: &HostValue) -> Result<Outcome> {
        match convert(self, value)? {
            Some(sexp) => {
                self.arena.retain(&mut self.engine, sexp);
                Ok(Outcome::Converted(sexp))
            }
            None => Ok(Outcome::Declined),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HostObject, SexpKind, TypeKey};
    use crate::MemoryEngine;

    fn converter() -> Converter<MemoryEngine> {
        Converter::new(MemoryEngine::new())
    }

    #[test]
    fn arena_is_empty_after_construction() {
        assert!(converter().arena().is_empty());
    }

    #[test]
    fn null_is_a_no_op() {
        let mut conv = converter();
        assert_eq!(conv.convert_to_r(HostValue::Null).unwrap(), Conversion::Null);
        assert!(conv.arena().is_empty());
        assert_eq!(conv.engine().live_count(), 0);
    }

    #[test]
    fn scalar_leaves_exactly_one_retained_handle() {
        let mut conv = converter();
        let result = conv.convert_to_r(HostValue::from(3.5)).unwrap();
        let ptr = result.foreign_ptr().unwrap();
        assert_eq!(conv.arena().len(), 1);
        assert!(conv.arena().contains(ptr));
        assert_eq!(conv.engine().as_real(ptr), Some(&[3.5][..]));
    }

    #[test]
    fn next_call_clears_the_arena() {
        let mut conv = converter();
        conv.convert_to_r(HostValue::from(vec![1, 2, 3])).unwrap();
        conv.convert_to_r(HostValue::from("x")).unwrap();
        assert_eq!(conv.arena().len(), 1);

        conv.convert_to_r(HostValue::Null).unwrap();
        assert!(conv.arena().is_empty());
    }

    #[test]
    fn previous_results_become_collectable_after_next_call() {
        let mut conv = converter();
        let first = conv
            .convert_to_r(HostValue::from(1.0))
            .unwrap()
            .foreign_ptr()
            .unwrap();
        conv.engine_mut().collect_garbage();
        assert!(conv.engine().is_live(first));

        conv.convert_to_r(HostValue::from(2.0)).unwrap();
        conv.engine_mut().collect_garbage();
        assert!(!conv.engine().is_live(first));
    }

    #[test]
    fn existing_handles_pass_through() {
        let mut conv = converter();
        let sexp = conv.engine_mut().integer_vector(&[9]).unwrap();
        let result = conv.convert_to_r(HostValue::Sexp(sexp)).unwrap();
        assert_eq!(result, Conversion::Foreign(sexp.ptr()));
        assert_eq!(conv.arena().handles(), &[sexp]);
        assert_eq!(conv.engine().live_count(), 1);
    }

    #[test]
    fn unknown_types_come_back_unchanged() {
        struct Widget(#[allow(dead_code)] u8);
        let mut conv = converter();
        let value = HostValue::from(HostObject::new(Widget(1)));
        let result = conv.convert_to_r(value.clone()).unwrap();
        assert_eq!(result.into_unchanged(), Some(value));
        assert!(conv.arena().is_empty());
    }

    #[test]
    fn objects_dispatch_on_the_exact_type_not_its_name() {
        fn convert_marker(
            conv: &mut Converter<MemoryEngine>,
            _value: &HostValue,
        ) -> Result<Option<Sexp>> {
            conv.engine_mut().integer_vector(&[1]).map(Some)
        }

        let registered = {
            struct Opaque;
            HostObject::new(Opaque)
        };
        let other = {
            struct Opaque;
            HostObject::new(Opaque)
        };

        let mut conv = converter();
        conv.registry_mut()
            .register(TypeKey::Object(registered.object_type()), convert_marker);

        let result = conv.convert_to_r(HostValue::from(registered)).unwrap();
        assert!(result.foreign_ptr().is_some());

        let value = HostValue::from(other);
        let result = conv.convert_to_r(value.clone()).unwrap();
        assert_eq!(result, Conversion::Unchanged(value));
    }

    #[test]
    fn strict_path_rejects_unknown_types_and_null() {
        struct Widget;
        let mut conv = converter();
        let err = conv
            .convert_or_fail(&HostValue::from(HostObject::new(Widget)))
            .unwrap_err();
        assert_eq!(err.error_type(), "unsupported_type");
        assert!(err.to_string().contains("Widget"));

        let err = conv.convert_or_fail(&HostValue::Null).unwrap_err();
        assert_eq!(err, ConvertError::NullArgument);
    }

    #[test]
    fn disabled_vectors_pass_through_at_top_level_but_fail_strictly() {
        let mut conv = converter();
        conv.set_convert_vectors(false);
        let value = HostValue::from(vec![1.0, 2.0]);

        let result = conv.convert_to_r(value.clone()).unwrap();
        assert_eq!(result, Conversion::Unchanged(value.clone()));

        let err = conv.convert_or_fail(&value).unwrap_err();
        assert_eq!(err, ConvertError::unsupported("double[]"));
    }

    #[test]
    fn dispatch_reports_missing_converter() {
        let mut conv = converter();
        assert_eq!(
            conv.dispatch(&HostValue::from(true)).unwrap(),
            Outcome::NoConverter
        );
        assert_eq!(conv.dispatch(&HostValue::Null).unwrap(), Outcome::NoConverter);
    }

    #[test]
    fn flags_can_come_from_config() {
        let config = ConverterConfig {
            convert_vectors: true,
            convert_value_types: false,
        };
        let mut conv = Converter::with_config(MemoryEngine::new(), config);
        assert!(!conv.convert_value_types());
        conv.set_convert_value_types(true);
        assert_eq!(conv.config(), ConverterConfig::default());

        let out = conv.convert_to_r(HostValue::from(vec![1i32])).unwrap();
        let ptr = out.foreign_ptr().unwrap();
        assert_eq!(conv.engine().get(ptr).unwrap().kind(), SexpKind::Integer);
    }
}
