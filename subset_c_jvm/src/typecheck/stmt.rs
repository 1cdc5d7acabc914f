//! Statement checking.

use subset_c_jvm_parser::ast::{Block, Stmt};

use super::TypeChecker;
use crate::types::CType;

impl TypeChecker<'_> {
    /// Check a block, honoring the function-entry "scope already open" flag
    /// so parameters and top-level body locals share one scope.
    pub(crate) fn check_block(&mut self, block: &Block) {
        let reuse_scope = std::mem::take(&mut self.fn_scope_open);
        if !reuse_scope {
            self.table.enter_scope();
        }
        for stmt in &block.stmts {
            self.check_stmt(stmt);
        }
        if !reuse_scope {
            self.table.exit_scope();
        }
    }

    pub(crate) fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.check_decl(decl),
            Stmt::Struct(def) => self.check_struct_def(def),
            Stmt::Expr { expr, .. } => {
                self.check_expr(expr);
            }
            Stmt::Block(block) => self.check_block(block),
            Stmt::If { cond, then_branch, else_branch, .. } => {
                self.check_expr(cond);
                self.check_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_stmt(else_branch);
                }
            }
            Stmt::While { cond, body, .. } => {
                self.check_expr(cond);
                self.loop_depth += 1;
                self.check_stmt(body);
                self.loop_depth -= 1;
            }
            Stmt::DoWhile { body, cond, .. } => {
                self.loop_depth += 1;
                self.check_stmt(body);
                self.loop_depth -= 1;
                self.check_expr(cond);
            }
            Stmt::For { init, cond, post, body, .. } => {
                // Loop-local declarations go out of scope with the loop.
                self.table.enter_scope();
                if let Some(init) = init {
                    self.check_stmt(init);
                }
                if let Some(cond) = cond {
                    self.check_expr(cond);
                }
                if let Some(post) = post {
                    self.check_expr(post);
                }
                self.loop_depth += 1;
                self.check_stmt(body);
                self.loop_depth -= 1;
                self.table.exit_scope();
            }
            Stmt::Return { value, span } => {
                let expected = self.return_type.clone().unwrap_or_else(CType::void);
                match value {
                    Some(value) => {
                        let ty = self.check_expr(value);
                        if expected.is_void() {
                            self.error(*span, "Return with a value in void function");
                        } else if !ty.is_error() && !ty.widens_to(&expected) {
                            self.error(*span, "Return type mismatch");
                        }
                    }
                    None => {
                        if !expected.is_void() && !expected.is_error() {
                            self.error(*span, "Return with no value in non-void function");
                        }
                    }
                }
            }
            Stmt::Break { span } => {
                if self.loop_depth == 0 {
                    self.error(*span, "'break' outside of loop");
                }
            }
            Stmt::Continue { span } => {
                if self.loop_depth == 0 {
                    self.error(*span, "'continue' outside of loop");
                }
            }
            Stmt::Empty { .. } => {}
        }
    }
}
