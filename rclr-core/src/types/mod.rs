pub mod config;
pub mod error;
pub mod matrix;
pub mod outcome;
pub mod sexp;
pub mod value;

pub use config::{ConverterConfig, CONFIG_FILE_NAME};
pub use error::{ConvertError, Result};
pub use matrix::Matrix;
pub use outcome::{Conversion, Outcome};
pub use sexp::{Sexp, SexpKind, SexpPtr};
pub use value::{
    ElementType, HostObject, HostValue, Jagged, Keyed, KeyedArray, MatrixValue, ObjectType, Scalar,
    TypeKey, Vector,
};
