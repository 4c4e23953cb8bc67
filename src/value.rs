//! Runtime values and their operators.
//!
//! Every binary operator is total: operands of incompatible kinds produce `Value::Error`, which
//! the parser turns into a diagnostic.  Mixed Int/Real operands are promoted to Real.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Int(i64),
    Real(f64),
    /// Fixed-length character value.  Its length is the number of characters it holds.
    Str(String),
    Bool(bool),
    Error,
}

/// Shape of the value a literal is about to be stored into.
///
/// An integer literal that lands in a `Real` slot becomes a Real and a string literal that lands
/// in a `Str` slot is fitted to the slot's length.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Slot {
    Untyped,
    Int,
    Real,
    Str(usize),
}

impl Value {
    /// Space-filled character value of `len` characters.
    pub fn blank(len: usize) -> Value {
        Value::Str(" ".repeat(len))
    }

    /// Character value of exactly `len` characters: `s` truncated or right-padded with spaces.
    pub fn fixed(s: &str, len: usize) -> Value {
        let mut fitted: String = s.chars().take(len).collect();
        let missing = len - fitted.chars().count();
        fitted.extend(std::iter::repeat(' ').take(missing));
        Value::Str(fitted)
    }

    pub fn slot(&self) -> Slot {
        match self {
            Value::Int(_) => Slot::Int,
            Value::Real(_) => Slot::Real,
            Value::Str(s) => Slot::Str(s.chars().count()),
            Value::Bool(_) | Value::Error => Slot::Untyped,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error)
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Real(_))
    }

    /// True for an Int or Real zero, the divisors rejected before dividing.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Real(r) => *r == 0.0,
            _ => false,
        }
    }

    /// `//`: concatenation, defined on strings only.
    pub fn catenate(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Str(l), Value::Str(r)) => Value::Str(format!("{}{}", l, r)),
            _ => Value::Error,
        }
    }

    /// `**`: always computed in floating point.
    pub fn power(&self, rhs: &Value) -> Value {
        match (self.as_real(), rhs.as_real()) {
            (Some(base), Some(exp)) => Value::Real(base.powf(exp)),
            _ => Value::Error,
        }
    }

    /// `==`: numbers compare with promotion, strings compare with strings.
    pub fn equals(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Int(l), Value::Int(r)) => Value::Bool(l == r),
            (Value::Str(l), Value::Str(r)) => Value::Bool(l == r),
            _ => self.compare_reals(rhs, |l, r| l == r),
        }
    }

    /// `<`: numbers only.
    pub fn less(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Int(l), Value::Int(r)) => Value::Bool(l < r),
            _ => self.compare_reals(rhs, |l, r| l < r),
        }
    }

    /// `>`: numbers only.
    pub fn greater(&self, rhs: &Value) -> Value {
        match (self, rhs) {
            (Value::Int(l), Value::Int(r)) => Value::Bool(l > r),
            _ => self.compare_reals(rhs, |l, r| l > r),
        }
    }

    fn as_real(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    fn compare_reals(&self, rhs: &Value, op: fn(f64, f64) -> bool) -> Value {
        match (self.as_real(), rhs.as_real()) {
            (Some(l), Some(r)) => Value::Bool(op(l, r)),
            _ => Value::Error,
        }
    }

    fn arithmetic(
        self,
        rhs: Value,
        int_op: fn(i64, i64) -> i64,
        real_op: fn(f64, f64) -> f64,
    ) -> Value {
        match (self, rhs) {
            (Value::Int(l), Value::Int(r)) => Value::Int(int_op(l, r)),
            (Value::Int(l), Value::Real(r)) => Value::Real(real_op(l as f64, r)),
            (Value::Real(l), Value::Int(r)) => Value::Real(real_op(l, r as f64)),
            (Value::Real(l), Value::Real(r)) => Value::Real(real_op(l, r)),
            _ => Value::Error,
        }
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        self.arithmetic(rhs, i64::wrapping_add, |l, r| l + r)
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        self.arithmetic(rhs, i64::wrapping_sub, |l, r| l - r)
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        self.arithmetic(rhs, i64::wrapping_mul, |l, r| l * r)
    }
}

/// Integer division truncates toward zero.  Callers reject zero divisors first.
impl Div for Value {
    type Output = Value;

    fn div(self, rhs: Value) -> Value {
        if let (Value::Int(_), Value::Int(0)) = (&self, &rhs) {
            return Value::Error;
        }
        self.arithmetic(rhs, i64::wrapping_div, |l, r| l / r)
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Value::Int(i) => Value::Int(i.wrapping_neg()),
            Value::Real(r) => Value::Real(-r),
            _ => Value::Error,
        }
    }
}

/// Print statement rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{:.2}", r),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Error => write!(f, "ERROR"),
        }
    }
}
