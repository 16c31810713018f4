//! Handles to values living in the interpreter's memory.

use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Raw pointer to an R symbolic expression.
///
/// For a native binding this is the `SEXP` address; for [`MemoryEngine`](crate::MemoryEngine)
/// it is a slot number. Either way it is never zero, so `Option<SexpPtr>` stays pointer-sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SexpPtr(NonZeroUsize);

impl SexpPtr {
    pub fn new(raw: usize) -> Option<Self> {
        NonZeroUsize::new(raw).map(Self)
    }

    /// Pointer for the zero-based slot `index`.
    pub(crate) fn from_slot(index: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(index))
    }

    pub fn as_raw(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for SexpPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<sexp {:#x}>", self.0.get())
    }
}

/// Type tag carried alongside a [`SexpPtr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SexpKind {
    Logical,
    Integer,
    Numeric,
    Character,
    /// Generic vector (`VECSXP`).
    List,
    NumericMatrix,
    IntegerMatrix,
    CharacterMatrix,
}

impl SexpKind {
    /// R's `SEXPTYPE` code for the underlying storage.
    pub fn sexptype(self) -> u32 {
        match self {
            SexpKind::Logical => 10,
            SexpKind::Integer | SexpKind::IntegerMatrix => 13,
            SexpKind::Numeric | SexpKind::NumericMatrix => 14,
            SexpKind::Character | SexpKind::CharacterMatrix => 16,
            SexpKind::List => 19,
        }
    }

    pub fn is_matrix(self) -> bool {
        matches!(
            self,
            SexpKind::NumericMatrix | SexpKind::IntegerMatrix | SexpKind::CharacterMatrix
        )
    }

    /// The name R's `typeof()` reports.
    pub fn type_name(self) -> &'static str {
        match self {
            SexpKind::Logical => "logical",
            SexpKind::Integer | SexpKind::IntegerMatrix => "integer",
            SexpKind::Numeric | SexpKind::NumericMatrix => "double",
            SexpKind::Character | SexpKind::CharacterMatrix => "character",
            SexpKind::List => "list",
        }
    }
}

/// A native value handle: a value already constructed inside the interpreter.
///
/// The handle does not own the value. The interpreter's collector reclaims it once
/// nothing preserves it, which is why every handle produced during a call is kept
/// in the [`RetentionArena`](crate::RetentionArena) until the next call starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sexp {
    ptr: SexpPtr,
    kind: SexpKind,
}

impl Sexp {
    pub fn new(ptr: SexpPtr, kind: SexpKind) -> Self {
        Self { ptr, kind }
    }

    pub fn ptr(&self) -> SexpPtr {
        self.ptr
    }

    pub fn kind(&self) -> SexpKind {
        self.kind
    }
}
