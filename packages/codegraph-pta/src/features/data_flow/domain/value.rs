//! Constant propagation lattice
//!
//! ```text
//!            NAC
//!   ... -1   0   1 ...
//!           UNDEF
//! ```
//!
//! A variable absent from a [`CPFact`] is UNDEF.

use crate::shared::models::VarId;
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// No value has reached this point yet
    #[default]
    Undef,
    Constant(i32),
    /// Not a constant
    Nac,
}

impl Value {
    #[inline]
    pub fn is_undef(&self) -> bool {
        matches!(self, Value::Undef)
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, Value::Constant(_))
    }

    #[inline]
    pub fn is_nac(&self) -> bool {
        matches!(self, Value::Nac)
    }

    #[inline]
    pub fn constant(&self) -> Option<i32> {
        match self {
            Value::Constant(c) => Some(*c),
            _ => None,
        }
    }

    /// Lattice meet
    pub fn meet(self, other: Value) -> Value {
        match (self, other) {
            (Value::Nac, _) | (_, Value::Nac) => Value::Nac,
            (Value::Undef, v) | (v, Value::Undef) => v,
            (Value::Constant(a), Value::Constant(b)) if a == b => Value::Constant(a),
            _ => Value::Nac,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undef => write!(f, "UNDEF"),
            Value::Constant(c) => write!(f, "{}", c),
            Value::Nac => write!(f, "NAC"),
        }
    }
}

/// Variable → value map
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CPFact {
    values: FxHashMap<VarId, Value>,
}

impl CPFact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: VarId) -> Value {
        self.values.get(&var).copied().unwrap_or(Value::Undef)
    }

    /// Set `var` to `value`; UNDEF removes the entry. Returns true on change.
    pub fn update(&mut self, var: VarId, value: Value) -> bool {
        if value.is_undef() {
            self.values.remove(&var).is_some()
        } else {
            self.values.insert(var, value) != Some(value)
        }
    }

    pub fn remove(&mut self, var: VarId) -> bool {
        self.values.remove(&var).is_some()
    }

    /// Overwrite with `other`, returns true on change
    pub fn copy_from(&mut self, other: &CPFact) -> bool {
        if self == other {
            return false;
        }
        self.values.clone_from(&other.values);
        true
    }

    /// Meet every entry of `self` into `target`
    pub fn meet_into(&self, target: &mut CPFact) {
        for (&var, &value) in &self.values {
            let met = value.meet(target.get(var));
            target.update(var, met);
        }
    }

    /// Entries sorted by variable
    pub fn entries(&self) -> Vec<(VarId, Value)> {
        let mut entries: Vec<_> = self.values.iter().map(|(&v, &val)| (v, val)).collect();
        entries.sort_unstable_by_key(|(v, _)| *v);
        entries
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
