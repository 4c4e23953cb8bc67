use std::collections::{HashMap, HashSet};

use crate::token::TokenKind;
use crate::value::Value;

/// Declared type of a variable.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum VarType {
    Integer,
    Real,
    Character,
}

impl VarType {
    pub fn from_keyword(kind: TokenKind) -> Option<VarType> {
        match kind {
            TokenKind::Integer => Some(VarType::Integer),
            TokenKind::Real => Some(VarType::Real),
            TokenKind::Character => Some(VarType::Character),
            _ => None,
        }
    }

    /// Value a variable holds right after its declaration.
    pub fn default_value(self, len: usize) -> Value {
        match self {
            VarType::Integer => Value::Int(0),
            VarType::Real => Value::Real(0.0),
            VarType::Character => Value::blank(len),
        }
    }

    /// Whether `value` may be assigned to a variable of this type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            VarType::Character => value.is_str(),
            VarType::Integer | VarType::Real => !value.is_str(),
        }
    }
}

/// Symbol environment of the program being interpreted.
///
/// Every name in `values` is also in `declared` and `types`.
#[derive(Debug, Default)]
pub struct Context {
    declared: HashSet<String>,
    types: HashMap<String, VarType>,
    initialized: HashSet<String>,
    values: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains(name)
    }

    pub fn is_initialized(&self, name: &str) -> bool {
        self.initialized.contains(name)
    }

    pub fn var_type(&self, name: &str) -> Option<VarType> {
        self.types.get(name).copied()
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Declare `name` with its default value.  Character variables count as initialized.
    ///
    /// Returns false if `name` was already declared.
    pub fn declare(&mut self, name: &str, var_type: VarType, len: usize) -> bool {
        if !self.declared.insert(name.to_string()) {
            return false;
        }
        self.types.insert(name.to_string(), var_type);
        if var_type == VarType::Character {
            self.initialized.insert(name.to_string());
        }
        self.values
            .insert(name.to_string(), var_type.default_value(len));
        true
    }

    /// Store `value` into declared variable `name` and mark it initialized.
    pub fn assign(&mut self, name: &str, value: Value) {
        debug_assert!(self.is_declared(name), "assignment to undeclared {}", name);
        self.initialized.insert(name.to_string());
        self.values.insert(name.to_string(), value);
    }
}
