// Library code reports through diagnostics and errors, never stderr; the
// mycc binary owns user-facing printing.
#![deny(clippy::print_stderr)]

//! Compiler from a C subset to JVM bytecode in Jasmin assembly form.
//!
//! The front end (lexer, parser, AST) lives in the `subset_c_jvm_parser`
//! crate, re-exported here as [`parser`]. This crate owns the back half of
//! the pipeline:
//!
//! - [`types`]: the type model (scalars, arrays, functions, nominal structs)
//! - [`symtab`]: scoped symbol table with arena-backed symbol ids
//! - [`typecheck`]: the single-pass semantic checker
//! - [`ir`] / [`lowering`]: linear stack IR and AST lowering
//! - [`codegen`]: Jasmin text emission
//! - [`pipeline`]: staging, file handling, class naming
//!
//! The emitted text targets the external Jasmin assembler and calls into
//! the fixed `lib440` runtime class for I/O (see [`stdlib`]).

pub mod codegen;
pub mod error;
pub mod ir;
pub mod lowering;
pub mod pipeline;
pub mod stdlib;
pub mod symtab;
pub mod typecheck;
pub mod types;

// Front-end crate, re-exported for consumers of the pipeline API.
pub use subset_c_jvm_parser as parser;

pub use error::{CompileError, Diagnostic};
pub use pipeline::{compile_file, compile_source, compile_to_jasmin, CompileOutcome};
pub use typecheck::{check, Checked};
pub use types::{CType, TypeKind};
