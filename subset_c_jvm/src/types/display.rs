//! Diagnostic spelling and JVM descriptors.
//!
//! Diagnostics use the same spelling as the JVM descriptor (`I`, `C`, `F`,
//! `V`, `[T`, `Ljava/lang/Object;`), matching the emitted class file text.

use std::fmt;

use super::{CType, TypeKind};

impl CType {
    /// JVM field/parameter descriptor for this type.
    ///
    /// Structs are opaque objects at the JVM level; the element type alone
    /// determines an array descriptor. `Error` falls back to `I`; it can
    /// only be reached on a best-effort emission after failed checks.
    pub fn descriptor(&self) -> String {
        match &self.kind {
            TypeKind::Int => "I".to_string(),
            TypeKind::Char => "C".to_string(),
            TypeKind::Float => "F".to_string(),
            TypeKind::Void => "V".to_string(),
            TypeKind::Error => "I".to_string(),
            TypeKind::Array { elem, .. } => format!("[{}", elem.descriptor()),
            TypeKind::Struct { .. } => "Ljava/lang/Object;".to_string(),
            TypeKind::Function { .. } => self.method_descriptor(),
        }
    }

    /// JVM method descriptor `(<params>)<ret>` for function types.
    ///
    /// Returns the plain descriptor for non-function types.
    pub fn method_descriptor(&self) -> String {
        match &self.kind {
            TypeKind::Function { ret, params } => {
                let mut out = String::from("(");
                for param in params {
                    out.push_str(&param.descriptor());
                }
                out.push(')');
                out.push_str(&ret.descriptor());
                out
            }
            _ => self.descriptor(),
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            return write!(f, "<error>");
        }
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.descriptor())
    }
}
