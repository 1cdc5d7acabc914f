//! The fixed `lib440` runtime interface.
//!
//! Seven I/O primitives are preinstalled into the global scope before user
//! code is checked, and special-cased by the emitter with fixed JVM
//! descriptors. The helper `java2c` (Java `String` to the compiler's char
//! array representation) is called by string-literal loads and is not
//! visible to user programs.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::symtab::SymbolTable;
use crate::types::CType;

/// Runtime class name.
pub const RUNTIME_CLASS: &str = "lib440";

/// Invocation line for the string-literal conversion helper.
pub const JAVA2C_CALL: &str = "invokestatic Method lib440 java2c (Ljava/lang/String;)[C";

/// JVM descriptors of the runtime entry points, keyed by name.
pub static CALL_DESCRIPTORS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("getchar", "()I"),
        ("putchar", "(I)I"),
        ("getint", "()I"),
        ("putint", "(I)V"),
        ("getfloat", "()F"),
        ("putfloat", "(F)V"),
        ("putstring", "([C)V"),
    ])
});

/// True for names resolved to `lib440` at emission time.
pub fn is_stdlib_function(name: &str) -> bool {
    CALL_DESCRIPTORS.contains_key(name)
}

/// Install the runtime signatures into the global scope.
///
/// Must run before user code is checked; the table is expected to be at
/// global scope.
pub fn install(table: &mut SymbolTable) {
    let char_array = CType::array(CType::char_().as_const(), 0);
    let entries = [
        ("getchar", CType::function(CType::int(), vec![])),
        ("putchar", CType::function(CType::int(), vec![CType::int()])),
        ("getint", CType::function(CType::int(), vec![])),
        ("putint", CType::function(CType::void(), vec![CType::int()])),
        ("getfloat", CType::function(CType::float(), vec![])),
        ("putfloat", CType::function(CType::void(), vec![CType::float()])),
        ("putstring", CType::function(CType::void(), vec![char_array])),
    ];
    for (name, ty) in entries {
        // The global scope is fresh; these cannot collide.
        let added = table.add_symbol(name, ty);
        debug_assert!(added.is_some(), "runtime signature collision for {}", name);
    }
}
