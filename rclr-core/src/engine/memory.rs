//! An in-process [`Engine`] with R's object model and a mark-and-sweep collector.
//!
//! Values are stored in slots addressed by [`SexpPtr`]. Anything not reachable from
//! a preserved root (through list elements or attributes) is reclaimed by
//! [`MemoryEngine::collect_garbage`], which is how tests observe that the
//! retention arena actually keeps handles alive.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::engine::Engine;
use crate::types::{ConvertError, Matrix, Result, Sexp, SexpKind, SexpPtr};

/// Vector payload of a stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum SexpData {
    Logical(Vec<bool>),
    Integer(Vec<i32>),
    Real(Vec<f64>),
    Character(Vec<String>),
    List(Vec<SexpPtr>),
}

impl SexpData {
    pub fn len(&self) -> usize {
        match self {
            SexpData::Logical(v) => v.len(),
            SexpData::Integer(v) => v.len(),
            SexpData::Real(v) => v.len(),
            SexpData::Character(v) => v.len(),
            SexpData::List(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SexpObject {
    kind: SexpKind,
    data: SexpData,
    attributes: IndexMap<String, SexpPtr>,
}

impl SexpObject {
    pub fn kind(&self) -> SexpKind {
        self.kind
    }

    pub fn data(&self) -> &SexpData {
        &self.data
    }

    pub fn attributes(&self) -> &IndexMap<String, SexpPtr> {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct MemoryEngine {
    slots: Vec<Option<SexpObject>>,
    /// Indices of collected slots, reused before the store grows.
    free: Vec<usize>,
    /// Preserve counts per root.
    preserved: HashMap<SexpPtr, usize>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: SexpKind, data: SexpData) -> Sexp {
        let object = Some(SexpObject {
            kind,
            data,
            attributes: IndexMap::new(),
        });
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = object;
                idx
            }
            None => {
                self.slots.push(object);
                self.slots.len() - 1
            }
        };
        Sexp::new(SexpPtr::from_slot(idx), kind)
    }

    fn slot_mut(&mut self, ptr: SexpPtr) -> Result<&mut SexpObject> {
        self.slots
            .get_mut(ptr.as_raw() - 1)
            .and_then(Option::as_mut)
            .ok_or_else(|| ConvertError::engine(format!("dangling pointer {ptr}")))
    }

    pub fn get(&self, ptr: SexpPtr) -> Option<&SexpObject> {
        self.slots.get(ptr.as_raw() - 1).and_then(Option::as_ref)
    }

    /// Like [`get`](Self::get) but reports a dangling pointer as an error.
    pub fn object(&self, ptr: SexpPtr) -> Result<&SexpObject> {
        self.get(ptr)
            .ok_or_else(|| ConvertError::engine(format!("dangling pointer {ptr}")))
    }

    pub fn is_live(&self, ptr: SexpPtr) -> bool {
        self.get(ptr).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_preserved(&self, ptr: SexpPtr) -> bool {
        self.preserved.contains_key(&ptr)
    }

    pub fn preserved_count(&self) -> usize {
        self.preserved.len()
    }

    pub fn attribute(&self, ptr: SexpPtr, name: &str) -> Option<&SexpObject> {
        let attr = *self.get(ptr)?.attributes.get(name)?;
        self.get(attr)
    }

    /// A character attribute such as `class` or `names`.
    pub fn attribute_strings(&self, ptr: SexpPtr, name: &str) -> Option<&[String]> {
        match self.attribute(ptr, name)?.data() {
            SexpData::Character(values) => Some(values),
            _ => None,
        }
    }

    /// `(nrow, ncol)` from the `dim` attribute.
    pub fn dim(&self, ptr: SexpPtr) -> Option<(usize, usize)> {
        match self.attribute(ptr, "dim")?.data() {
            SexpData::Integer(d) if d.len() == 2 => {
                Some((usize::try_from(d[0]).ok()?, usize::try_from(d[1]).ok()?))
            }
            _ => None,
        }
    }

    pub fn as_real(&self, ptr: SexpPtr) -> Option<&[f64]> {
        match self.get(ptr)?.data() {
            SexpData::Real(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self, ptr: SexpPtr) -> Option<&[i32]> {
        match self.get(ptr)?.data() {
            SexpData::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_character(&self, ptr: SexpPtr) -> Option<&[String]> {
        match self.get(ptr)?.data() {
            SexpData::Character(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_logical(&self, ptr: SexpPtr) -> Option<&[bool]> {
        match self.get(ptr)?.data() {
            SexpData::Logical(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self, ptr: SexpPtr) -> Option<&[SexpPtr]> {
        match self.get(ptr)?.data() {
            SexpData::List(v) => Some(v),
            _ => None,
        }
    }

    /// Reclaim everything unreachable from a preserved root. Returns the number
    /// of values freed.
    pub fn collect_garbage(&mut self) -> usize {
        let mut marked = vec![false; self.slots.len()];
        let mut stack: Vec<SexpPtr> = self.preserved.keys().copied().collect();

        while let Some(ptr) = stack.pop() {
            let idx = ptr.as_raw() - 1;
            if marked.get(idx).copied().unwrap_or(true) {
                continue;
            }
            let Some(obj) = self.slots[idx].as_ref() else {
                continue;
            };
            marked[idx] = true;
            stack.extend(obj.attributes.values().copied());
            if let SexpData::List(children) = &obj.data {
                stack.extend(children.iter().copied());
            }
        }

        let mut freed = 0;
        for (idx, (slot, keep)) in self.slots.iter_mut().zip(marked).enumerate() {
            if !keep && slot.take().is_some() {
                self.free.push(idx);
                freed += 1;
            }
        }
        log::trace!("collected {freed} unreachable values");
        freed
    }
}

impl Engine for MemoryEngine {
    fn numeric_vector(&mut self, values: &[f64]) -> Result<Sexp> {
        Ok(self.alloc(SexpKind::Numeric, SexpData::Real(values.to_vec())))
    }

    fn integer_vector(&mut self, values: &[i32]) -> Result<Sexp> {
        Ok(self.alloc(SexpKind::Integer, SexpData::Integer(values.to_vec())))
    }

    fn character_vector(&mut self, values: &[String]) -> Result<Sexp> {
        Ok(self.alloc(SexpKind::Character, SexpData::Character(values.to_vec())))
    }

    fn logical_vector(&mut self, values: &[bool]) -> Result<Sexp> {
        Ok(self.alloc(SexpKind::Logical, SexpData::Logical(values.to_vec())))
    }

    fn numeric_matrix(&mut self, matrix: &Matrix<f64>) -> Result<Sexp> {
        let sexp = self.alloc(
            SexpKind::NumericMatrix,
            SexpData::Real(matrix.to_column_major()),
        );
        self.set_dim(sexp, matrix.nrow(), matrix.ncol())?;
        Ok(sexp)
    }

    fn integer_matrix(&mut self, matrix: &Matrix<i32>) -> Result<Sexp> {
        let sexp = self.alloc(
            SexpKind::IntegerMatrix,
            SexpData::Integer(matrix.to_column_major()),
        );
        self.set_dim(sexp, matrix.nrow(), matrix.ncol())?;
        Ok(sexp)
    }

    fn character_matrix(&mut self, matrix: &Matrix<String>) -> Result<Sexp> {
        let sexp = self.alloc(
            SexpKind::CharacterMatrix,
            SexpData::Character(matrix.to_column_major()),
        );
        self.set_dim(sexp, matrix.nrow(), matrix.ncol())?;
        Ok(sexp)
    }

    fn generic_vector(&mut self, elements: &[Sexp]) -> Result<Sexp> {
        for element in elements {
            self.object(element.ptr())?;
        }
        let children = elements.iter().map(Sexp::ptr).collect();
        Ok(self.alloc(SexpKind::List, SexpData::List(children)))
    }

    /// Classed vectors keep their class-level attributes on every element, as
    /// R's `as.list.POSIXct` and `as.list.difftime` do. `dim` is always dropped.
    fn coerce_to_list(&mut self, sexp: Sexp) -> Result<Sexp> {
        let obj = self.object(sexp.ptr())?.clone();
        if obj.kind == SexpKind::List {
            return Ok(sexp);
        }

        let carried: Vec<(String, SexpPtr)> = if obj.attributes.contains_key("class") {
            obj.attributes
                .iter()
                .filter(|(name, _)| !matches!(name.as_str(), "names" | "dim"))
                .map(|(name, ptr)| (name.clone(), *ptr))
                .collect()
        } else {
            Vec::new()
        };

        let children: Vec<SexpPtr> = match obj.data {
            SexpData::Logical(v) => v
                .into_iter()
                .map(|x| self.alloc(SexpKind::Logical, SexpData::Logical(vec![x])).ptr())
                .collect(),
            SexpData::Integer(v) => v
                .into_iter()
                .map(|x| self.alloc(SexpKind::Integer, SexpData::Integer(vec![x])).ptr())
                .collect(),
            SexpData::Real(v) => v
                .into_iter()
                .map(|x| self.alloc(SexpKind::Numeric, SexpData::Real(vec![x])).ptr())
                .collect(),
            SexpData::Character(v) => v
                .into_iter()
                .map(|x| {
                    self.alloc(SexpKind::Character, SexpData::Character(vec![x]))
                        .ptr()
                })
                .collect(),
            SexpData::List(v) => v,
        };

        for &child in &children {
            self.slot_mut(child)?
                .attributes
                .extend(carried.iter().cloned());
        }

        let list = self.alloc(SexpKind::List, SexpData::List(children));
        if let Some(&names) = obj.attributes.get("names") {
            self.slot_mut(list.ptr())?
                .attributes
                .insert("names".to_string(), names);
        }
        Ok(list)
    }

    fn set_attribute(&mut self, target: Sexp, name: &str, value: Sexp) -> Result<()> {
        self.object(value.ptr())?;
        self.slot_mut(target.ptr())?
            .attributes
            .insert(name.to_string(), value.ptr());
        Ok(())
    }

    fn preserve(&mut self, sexp: Sexp) {
        *self.preserved.entry(sexp.ptr()).or_insert(0) += 1;
    }

    fn release(&mut self, sexp: Sexp) {
        if let Some(count) = self.preserved.get_mut(&sexp.ptr()) {
            *count -= 1;
            if *count == 0 {
                self.preserved.remove(&sexp.ptr());
            }
        }
    }
}

impl MemoryEngine {
    fn set_dim(&mut self, target: Sexp, nrow: usize, ncol: usize) -> Result<()> {
        let to_int = |n: usize| {
            i32::try_from(n).map_err(|_| ConvertError::engine(format!("dimension {n} too large")))
        };
        let dim = self.integer_vector(&[to_int(nrow)?, to_int(ncol)?])?;
        self.set_attribute(target, "dim", dim)
    }
}
