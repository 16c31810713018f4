//! rclr Core Library
//!
//! Converts host values into R symbolic expressions (SEXPs) for an embedded R
//! interpreter.
//!
//! # Architecture
//!
//! - `types`: Host values, handles, errors, configuration
//! - `engine`: The binding to the interpreter, plus an in-memory implementation
//! - `ops`: Converters per value shape and the exact-type registry
//! - `helpers`: Retention arena, attribute decoration, reshaping, time encoding
//! - `converter`: The conversion facade
//! - `session`: The single process-wide session

pub mod converter;
pub mod engine;
pub mod helpers;
pub mod ops;
pub mod session;
pub mod types;

// Re-export commonly used types at crate root
pub use types::{
    Conversion,
    ConvertError,
    ConverterConfig,
    ElementType,
    HostObject,
    HostValue,
    Jagged,
    Keyed,
    KeyedArray,
    Matrix,
    MatrixValue,
    ObjectType,
    Outcome,
    Result,
    Scalar,
    Sexp,
    SexpKind,
    SexpPtr,
    TypeKey,
    Vector,
    CONFIG_FILE_NAME,
};

pub use converter::Converter;
pub use engine::memory::{MemoryEngine, SexpData, SexpObject};
pub use engine::Engine;
pub use helpers::arena::RetentionArena;
pub use ops::registry::{ConvertFn, Registry};
pub use session::{Session, SessionError, SessionResult};
