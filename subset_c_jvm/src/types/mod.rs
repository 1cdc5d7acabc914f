//! Type model for the C subset.
//!
//! The source language has three scalar types (`int`, `char`, `float`),
//! `void`, fixed-size arrays, function types and nominal structs. Every type
//! carries a `const` flag; for arrays the flag on the element governs write
//! permission at element granularity.
//!
//! An explicit [`TypeKind::Error`] variant replaces the null sentinel the
//! diagnostics recovery scheme would otherwise need: a failed check yields
//! `Error`, and every rule accepts `Error` operands silently so one mistake
//! produces one message.
//!
//! # Sub-modules
//!
//! - `display`: diagnostic spelling and JVM descriptors

mod display;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

/// A type with its const qualifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CType {
    pub kind: TypeKind,
    pub is_const: bool,
}

/// The shape of a [`CType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    Int,
    Char,
    Float,
    /// Function return type and internal "no type" positions only.
    Void,
    /// Produced when checking failed; compatible with everything.
    Error,
    /// Fixed-size array. `size == 0` means "not yet known" and is resolved
    /// during declaration checking (default 10, or string length + 1).
    Array { elem: Box<CType>, size: u32 },
    Function { ret: Box<CType>, params: Vec<CType> },
    /// Nominal: two struct types are equal iff their names are.
    Struct { name: String, members: Vec<StructMember> },
}

/// One named member of a struct type, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructMember {
    pub name: String,
    pub ty: CType,
}

impl CType {
    pub fn int() -> Self {
        Self { kind: TypeKind::Int, is_const: false }
    }

    pub fn char_() -> Self {
        Self { kind: TypeKind::Char, is_const: false }
    }

    pub fn float() -> Self {
        Self { kind: TypeKind::Float, is_const: false }
    }

    pub fn void() -> Self {
        Self { kind: TypeKind::Void, is_const: false }
    }

    pub fn error() -> Self {
        Self { kind: TypeKind::Error, is_const: false }
    }

    pub fn array(elem: CType, size: u32) -> Self {
        Self {
            kind: TypeKind::Array { elem: Box::new(elem), size },
            is_const: false,
        }
    }

    pub fn function(ret: CType, params: Vec<CType>) -> Self {
        Self {
            kind: TypeKind::Function { ret: Box::new(ret), params },
            is_const: false,
        }
    }

    pub fn struct_(name: impl Into<String>, members: Vec<StructMember>) -> Self {
        Self {
            kind: TypeKind::Struct { name: name.into(), members },
            is_const: false,
        }
    }

    /// The same type with the const flag set.
    pub fn as_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    // ==================== Predicates ====================

    pub fn is_error(&self) -> bool {
        matches!(self.kind, TypeKind::Error)
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_char(&self) -> bool {
        matches!(self.kind, TypeKind::Char)
    }

    pub fn is_float(&self) -> bool {
        matches!(self.kind, TypeKind::Float)
    }

    /// `int` or `float` (the arithmetic operand rule).
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, TypeKind::Int | TypeKind::Float)
    }

    /// `int` or `char` (modulo, bitwise, shift, array index).
    pub fn is_integral(&self) -> bool {
        matches!(self.kind, TypeKind::Int | TypeKind::Char)
    }

    /// Any value usable as a runtime truth value.
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, TypeKind::Int | TypeKind::Char | TypeKind::Float)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, TypeKind::Function { .. })
    }

    /// Element type for arrays.
    pub fn elem(&self) -> Option<&CType> {
        match &self.kind {
            TypeKind::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Member lookup on struct types.
    pub fn member(&self, name: &str) -> Option<&StructMember> {
        match &self.kind {
            TypeKind::Struct { members, .. } => members.iter().find(|m| m.name == name),
            _ => None,
        }
    }

    // ==================== Comparison ====================

    /// Type equality, ignoring const qualifiers.
    ///
    /// Structural except for structs, which compare by name only. Array
    /// sizes are ignored so a sized array matches an `[]` parameter.
    /// `Error` matches everything, suppressing dependent diagnostics.
    pub fn same_type(&self, other: &CType) -> bool {
        match (&self.kind, &other.kind) {
            (TypeKind::Error, _) | (_, TypeKind::Error) => true,
            (TypeKind::Int, TypeKind::Int)
            | (TypeKind::Char, TypeKind::Char)
            | (TypeKind::Float, TypeKind::Float)
            | (TypeKind::Void, TypeKind::Void) => true,
            (TypeKind::Array { elem: a, .. }, TypeKind::Array { elem: b, .. }) => a.same_type(b),
            (TypeKind::Struct { name: a, .. }, TypeKind::Struct { name: b, .. }) => a == b,
            (
                TypeKind::Function { ret: ra, params: pa },
                TypeKind::Function { ret: rb, params: pb },
            ) => {
                ra.same_type(rb)
                    && pa.len() == pb.len()
                    && pa.iter().zip(pb).all(|(a, b)| a.same_type(b))
            }
            _ => false,
        }
    }

    /// The widening relation: equal types, or a step along
    /// `char ⊑ int ⊑ float`. Not symmetric.
    pub fn widens_to(&self, target: &CType) -> bool {
        if self.same_type(target) {
            return true;
        }
        matches!(
            (&self.kind, &target.kind),
            (TypeKind::Char, TypeKind::Int)
                | (TypeKind::Char, TypeKind::Float)
                | (TypeKind::Int, TypeKind::Float)
        )
    }
}
