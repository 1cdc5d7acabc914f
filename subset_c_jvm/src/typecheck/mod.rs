//! Semantic analysis: one recursive pass over the AST.
//!
//! The checker computes a type for every expression, binds identifier uses
//! to symbols, assigns local slot indices through the symbol table, and
//! enforces the language's static rules. Results land in side tables keyed
//! by [`NodeId`]; the AST itself is never mutated.
//!
//! Errors never stop the pass: the offending node gets [`CType::error`],
//! which every rule accepts silently, so one mistake produces one message
//! and checking continues.

mod expr;
mod stmt;

use std::collections::HashMap;

use subset_c_jvm_parser::ast::{
    ArrayLen, Decl, Expr, Function, Item, NodeId, Program, StructDef, TypeSpec,
};
use subset_c_jvm_parser::Span;

use crate::error::Diagnostic;
use crate::stdlib;
use crate::symtab::{SymbolId, SymbolTable};
use crate::types::{CType, StructMember, TypeKind};

/// Array size used when neither the declarator nor an initializer supplies
/// one.
const DEFAULT_ARRAY_SIZE: u32 = 10;

/// Everything the later passes need from semantic analysis.
#[derive(Debug)]
pub struct Checked {
    pub symbols: SymbolTable,
    pub types: HashMap<NodeId, CType>,
    pub bindings: HashMap<NodeId, SymbolId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Checked {
    /// Inferred type of a node; `Error` if checking failed for it.
    pub fn ty(&self, id: NodeId) -> CType {
        self.types.get(&id).cloned().unwrap_or_else(CType::error)
    }

    pub fn binding(&self, id: NodeId) -> Option<SymbolId> {
        self.bindings.get(&id).copied()
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Type-check a whole translation unit.
pub fn check(program: &Program, file: &str) -> Checked {
    let mut checker = TypeChecker::new(file);
    for item in &program.items {
        checker.check_item(item);
    }
    checker.finish()
}

pub(crate) struct TypeChecker<'a> {
    file: &'a str,
    pub(crate) table: SymbolTable,
    types: HashMap<NodeId, CType>,
    bindings: HashMap<NodeId, SymbolId>,
    diagnostics: Vec<Diagnostic>,
    /// Declared return type of the function being checked.
    pub(crate) return_type: Option<CType>,
    /// Set on entry to a function so its body block does not open another
    /// scope; parameters and body locals share one scope.
    pub(crate) fn_scope_open: bool,
    /// Nesting depth of enclosing loops; break/continue need depth > 0.
    pub(crate) loop_depth: u32,
}

impl<'a> TypeChecker<'a> {
    fn new(file: &'a str) -> Self {
        let mut table = SymbolTable::new();
        stdlib::install(&mut table);
        Self {
            file,
            table,
            types: HashMap::new(),
            bindings: HashMap::new(),
            diagnostics: Vec::new(),
            return_type: None,
            fn_scope_open: false,
            loop_depth: 0,
        }
    }

    fn finish(self) -> Checked {
        Checked {
            symbols: self.table,
            types: self.types,
            bindings: self.bindings,
            diagnostics: self.diagnostics,
        }
    }

    pub(crate) fn error(&mut self, span: Span, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::new(self.file, span.line, message));
    }

    pub(crate) fn record(&mut self, id: NodeId, ty: CType) -> CType {
        self.types.insert(id, ty.clone());
        ty
    }

    pub(crate) fn bind(&mut self, id: NodeId, symbol: SymbolId) {
        self.bindings.insert(id, symbol);
    }

    fn check_item(&mut self, item: &Item) {
        match item {
            Item::Decl(decl) => self.check_decl(decl),
            Item::Function(func) => self.check_function(func),
            Item::Struct(def) => self.check_struct_def(def),
        }
    }

    // ==================== Type resolution ====================

    /// Resolve a syntactic specifier to a semantic type.
    pub(crate) fn resolve_spec(&mut self, spec: &TypeSpec, span: Span) -> CType {
        match spec {
            TypeSpec::Int => CType::int(),
            TypeSpec::Char => CType::char_(),
            TypeSpec::Float => CType::float(),
            TypeSpec::Void => CType::void(),
            TypeSpec::Struct(name) => match self.table.lookup_struct(name) {
                Some(id) => self.table.symbol(id).ty.clone(),
                None => {
                    self.error(span, format!("Unknown struct type '{}'", name));
                    CType::error()
                }
            },
        }
    }

    /// The declared type of a variable, before size resolution.
    ///
    /// For arrays the const qualifier lands on the element; element writes
    /// are what it governs.
    pub(crate) fn declared_type(&mut self, decl: &Decl) -> CType {
        let mut base = self.resolve_spec(&decl.spec, decl.span);
        if decl.is_const {
            base = base.as_const();
        }
        match decl.array {
            None => base,
            Some(ArrayLen::Unspecified) => CType::array(base, 0),
            Some(ArrayLen::Fixed(n)) => CType::array(base, n),
        }
    }

    // ==================== Declarations ====================

    pub(crate) fn check_decl(&mut self, decl: &Decl) {
        let init_ty = decl.init.as_ref().map(|init| self.check_expr(init));
        let mut ty = self.declared_type(decl);

        let base_is_void = match &ty.kind {
            TypeKind::Void => true,
            TypeKind::Array { elem, .. } => elem.is_void(),
            _ => false,
        };
        if base_is_void {
            self.error(decl.span, format!("Variable '{}' declared void", decl.name));
            ty = CType::error();
        }

        // Resolve a still-unknown array size before emission can need it:
        // a string-literal initializer supplies length + 1, anything else
        // falls back to the default.
        if let TypeKind::Array { size, .. } = &mut ty.kind {
            if *size == 0 {
                *size = match decl.init.as_ref() {
                    Some(Expr::StrLit { value, .. }) => value.len() as u32 + 1,
                    _ => DEFAULT_ARRAY_SIZE,
                };
            }
        }

        if let Some(init_ty) = init_ty {
            self.check_initializer(decl, &ty, &init_ty);
        }

        match self.table.add_symbol(&decl.name, ty.clone()) {
            Some(id) => self.bind(decl.id, id),
            None => self.error(decl.span, format!("Redeclaration of '{}'", decl.name)),
        }
        self.record(decl.id, ty);
    }

    fn check_initializer(&mut self, decl: &Decl, ty: &CType, init_ty: &CType) {
        if ty.is_error() || init_ty.is_error() {
            return;
        }
        let compatible = match &ty.kind {
            // Only string literals initialize arrays, and only char arrays.
            TypeKind::Array { elem, .. } => {
                init_ty.is_array()
                    && elem.is_char()
                    && init_ty.elem().is_some_and(|e| e.is_char())
            }
            TypeKind::Struct { .. } => init_ty.same_type(ty),
            _ => !init_ty.is_void() && init_ty.widens_to(ty),
        };
        if !compatible {
            self.error(
                decl.span,
                format!("Incompatible types in initialization of '{}'", decl.name),
            );
        }
    }

    // ==================== Structs ====================

    pub(crate) fn check_struct_def(&mut self, def: &StructDef) {
        let mut members: Vec<StructMember> = Vec::with_capacity(def.members.len());
        for member in &def.members {
            let mut ty = self.declared_type(member);
            if ty.is_void() || ty.elem().is_some_and(|e| e.is_void()) {
                self.error(
                    member.span,
                    format!("Variable '{}' declared void", member.name),
                );
                ty = CType::error();
            }
            if let TypeKind::Array { size, .. } = &mut ty.kind {
                if *size == 0 {
                    *size = DEFAULT_ARRAY_SIZE;
                }
            }
            if members.iter().any(|m: &StructMember| m.name == member.name) {
                self.error(
                    member.span,
                    format!("Duplicate member '{}' in struct '{}'", member.name, def.name),
                );
                continue;
            }
            self.record(member.id, ty.clone());
            members.push(StructMember {
                name: member.name.clone(),
                ty,
            });
        }

        let ty = CType::struct_(def.name.clone(), members);
        match self.table.add_struct(&def.name, ty.clone()) {
            Some(id) => self.bind(def.id, id),
            None => self.error(def.span, format!("Redefinition of struct '{}'", def.name)),
        }
        self.record(def.id, ty);
    }

    // ==================== Functions ====================

    fn check_function(&mut self, func: &Function) {
        let ret = self.resolve_spec(&func.return_spec, func.span);

        let mut param_types = Vec::with_capacity(func.params.len());
        for param in &func.params {
            let ty = self.declared_type(param);
            if ty.is_void() {
                self.error(
                    param.span,
                    format!("Parameter '{}' declared void", param.name),
                );
                param_types.push(CType::error());
            } else {
                param_types.push(ty);
            }
        }

        let fn_ty = CType::function(ret.clone(), param_types.clone());
        match self.table.add_symbol(&func.name, fn_ty.clone()) {
            Some(id) => self.bind(func.id, id),
            None => self.error(func.span, format!("Redeclaration of '{}'", func.name)),
        }
        self.record(func.id, fn_ty);

        // Parameters share the function scope with body locals, occupying
        // slots 0..param_count.
        self.table.enter_scope();
        for (param, ty) in func.params.iter().zip(param_types) {
            match self.table.add_symbol(&param.name, ty.clone()) {
                Some(id) => self.bind(param.id, id),
                None => self.error(param.span, format!("Redeclaration of '{}'", param.name)),
            }
            self.record(param.id, ty);
        }

        let saved_return = self.return_type.replace(ret);
        let saved_loop_depth = std::mem::replace(&mut self.loop_depth, 0);
        self.fn_scope_open = true;
        self.check_block(&func.body);
        self.fn_scope_open = false;
        self.loop_depth = saved_loop_depth;
        self.return_type = saved_return;
        self.table.exit_scope();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subset_c_jvm_parser::parse;

    fn check_src(source: &str) -> Checked {
        let program = parse(source).expect("parse failed");
        check(&program, "test.c")
    }

    #[test]
    fn test_clean_program_has_no_diagnostics() {
        let checked = check_src("int main() { int x; x = 1 + 2; return x; }");
        assert!(checked.is_ok(), "{:?}", checked.diagnostics);
    }

    #[test]
    fn test_every_expression_is_typed() {
        let source = "int g; int add(int a, int b) { return a + b; }\
                      int main() { g = add(1, 2) * 3; return g; }";
        let program = parse(source).expect("parse failed");
        let checked = check(&program, "test.c");
        assert!(checked.is_ok());

        fn walk(expr: &subset_c_jvm_parser::ast::Expr, checked: &Checked) {
            assert!(
                checked.types.contains_key(&expr.id()),
                "untyped expression {:?}",
                expr
            );
            use subset_c_jvm_parser::ast::Expr::*;
            match expr {
                Binary { lhs, rhs, .. } | Logical { lhs, rhs, .. } => {
                    walk(lhs, checked);
                    walk(rhs, checked);
                }
                Assign { target, value, .. } => {
                    walk(target, checked);
                    walk(value, checked);
                }
                Call { callee, args, .. } => {
                    walk(callee, checked);
                    args.iter().for_each(|a| walk(a, checked));
                }
                _ => {}
            }
        }
        for item in &program.items {
            if let Item::Function(f) = item {
                for stmt in &f.body.stmts {
                    if let subset_c_jvm_parser::ast::Stmt::Expr { expr, .. } = stmt {
                        walk(expr, &checked);
                    }
                    if let subset_c_jvm_parser::ast::Stmt::Return { value: Some(v), .. } = stmt {
                        walk(v, &checked);
                    }
                }
            }
        }
    }

    #[test]
    fn test_parameters_get_leading_slots() {
        let checked = check_src("int f(int a, float b) { int c; return a; }");
        assert!(checked.is_ok());
        let locals: std::collections::HashSet<_> = checked
            .bindings
            .values()
            .copied()
            .filter(|&id| checked.symbols.symbol(id).is_local)
            .collect();
        let slots: std::collections::HashMap<String, usize> = locals
            .into_iter()
            .map(|id| {
                let symbol = checked.symbols.symbol(id);
                (symbol.name.clone(), symbol.local_index)
            })
            .collect();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots["a"], 0);
        assert_eq!(slots["b"], 1);
        assert_eq!(slots["c"], 2);
    }

    #[test]
    fn test_rechecking_is_idempotent() {
        let source = "int x; int main() { x = 41; return x + 1; }";
        let program = parse(source).expect("parse failed");
        let first = check(&program, "test.c");
        let second = check(&program, "test.c");
        assert_eq!(first.types, second.types);
        assert_eq!(first.bindings, second.bindings);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    #[test]
    fn test_string_literal_sets_array_size() {
        let checked = check_src("int main() { char s[] = \"abc\"; return 0; }");
        assert!(checked.is_ok());
        let size = checked
            .types
            .values()
            .find_map(|t| match &t.kind {
                TypeKind::Array { size, elem } if elem.is_char() => Some(*size),
                _ => None,
            })
            .expect("no char array type recorded");
        assert_eq!(size, 4);
    }

    #[test]
    fn test_unsized_array_defaults_to_ten() {
        let checked = check_src("int main() { int a[]; return a[0]; }");
        assert!(checked.is_ok());
        let size = checked
            .types
            .values()
            .find_map(|t| match &t.kind {
                TypeKind::Array { size, .. } => Some(*size),
                _ => None,
            })
            .unwrap();
        assert_eq!(size, 10);
    }
}
