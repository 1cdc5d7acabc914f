//! Statement lowering.

use subset_c_jvm_parser::ast::{Decl, Expr, Stmt};

use super::{IrGenerator, LoopLabels};
use crate::ir::Instr;
use crate::types::TypeKind;

impl IrGenerator<'_> {
    pub(crate) fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.gen_decl(decl),
            Stmt::Struct(_) | Stmt::Empty { .. } => {}
            Stmt::Expr { expr, .. } => self.gen_expr_stmt(expr),
            Stmt::Block(block) => {
                for stmt in &block.stmts {
                    self.gen_stmt(stmt);
                }
            }
            Stmt::If { cond, then_branch, else_branch, .. } => {
                self.gen_expr(cond);
                let l_else = self.fresh_label();
                self.emit(Instr::JumpIfZero(l_else.clone()));
                self.gen_stmt(then_branch);
                let l_end = self.fresh_label();
                self.emit(Instr::Jump(l_end.clone()));
                self.emit(Instr::Label(l_else));
                if let Some(else_branch) = else_branch {
                    self.gen_stmt(else_branch);
                }
                self.emit(Instr::Label(l_end));
            }
            Stmt::While { cond, body, .. } => {
                let l_start = self.fresh_label();
                self.emit(Instr::Label(l_start.clone()));
                self.gen_expr(cond);
                let l_end = self.fresh_label();
                self.emit(Instr::JumpIfZero(l_end.clone()));
                self.loop_stack.push(LoopLabels {
                    break_label: l_end.clone(),
                    continue_label: l_start.clone(),
                });
                self.gen_stmt(body);
                self.loop_stack.pop();
                self.emit(Instr::Jump(l_start));
                self.emit(Instr::Label(l_end));
            }
            Stmt::DoWhile { body, cond, .. } => {
                let l_start = self.fresh_label();
                let l_cond = self.fresh_label();
                let l_end = self.fresh_label();
                self.emit(Instr::Label(l_start.clone()));
                self.loop_stack.push(LoopLabels {
                    break_label: l_end.clone(),
                    continue_label: l_cond.clone(),
                });
                self.gen_stmt(body);
                self.loop_stack.pop();
                self.emit(Instr::Label(l_cond));
                self.gen_expr(cond);
                self.emit(Instr::JumpIfZero(l_end.clone()));
                self.emit(Instr::Jump(l_start));
                self.emit(Instr::Label(l_end));
            }
            Stmt::For { init, cond, post, body, .. } => {
                if let Some(init) = init {
                    self.gen_stmt(init);
                }
                let l_start = self.fresh_label();
                self.emit(Instr::Label(l_start.clone()));
                let l_end = self.fresh_label();
                if let Some(cond) = cond {
                    self.gen_expr(cond);
                    self.emit(Instr::JumpIfZero(l_end.clone()));
                }
                let l_post = self.fresh_label();
                self.loop_stack.push(LoopLabels {
                    break_label: l_end.clone(),
                    continue_label: l_post.clone(),
                });
                self.gen_stmt(body);
                self.loop_stack.pop();
                self.emit(Instr::Label(l_post));
                if let Some(post) = post {
                    self.gen_expr_stmt(post);
                }
                self.emit(Instr::Jump(l_start));
                self.emit(Instr::Label(l_end));
            }
            Stmt::Return { value, .. } => match value {
                Some(value) => {
                    let value_ty = self.checked.ty(value.id());
                    let return_ty = self.return_type.clone();
                    self.gen_expr(value);
                    self.widen(&value_ty, &return_ty);
                    self.emit(Instr::Return);
                }
                None => self.emit(Instr::ReturnVoid),
            },
            Stmt::Break { .. } => {
                if let Some(top) = self.loop_stack.last() {
                    let label = top.break_label.clone();
                    self.emit(Instr::Jump(label));
                }
            }
            Stmt::Continue { .. } => {
                if let Some(top) = self.loop_stack.last() {
                    let label = top.continue_label.clone();
                    self.emit(Instr::Jump(label));
                }
            }
        }
    }

    /// Expression in statement context: no value may remain on the stack.
    fn gen_expr_stmt(&mut self, expr: &Expr) {
        match expr {
            Expr::Assign { op, target, value, .. } => self.gen_assign(*op, target, value, false),
            Expr::Unary { op, operand, .. } if op.is_inc_dec() => {
                self.gen_incdec(*op, operand, false)
            }
            Expr::Call { .. } => {
                self.gen_call(expr);
                if !self.checked.ty(expr.id()).is_void() {
                    self.emit(Instr::Pop);
                }
            }
            _ => {
                self.gen_expr(expr);
                if !self.checked.ty(expr.id()).is_void() {
                    self.emit(Instr::Pop);
                }
            }
        }
    }

    /// Local declaration: arrays allocate (or load their string literal),
    /// scalars with an initializer store it.
    fn gen_decl(&mut self, decl: &Decl) {
        let Some(symbol_id) = self.checked.binding(decl.id) else {
            return;
        };
        let ty = self.checked.ty(decl.id);

        match &ty.kind {
            TypeKind::Array { elem, size } => {
                match decl.init.as_ref() {
                    Some(Expr::StrLit { value, .. }) if elem.is_char() => {
                        self.emit(Instr::PushString(value.clone()));
                    }
                    _ => {
                        self.emit(Instr::PushInt(*size as i32));
                        self.emit(Instr::AllocArray { symbol: symbol_id });
                    }
                }
                self.store_decl(symbol_id);
            }
            _ => {
                if let Some(init) = decl.init.as_ref() {
                    let init_ty = self.checked.ty(init.id());
                    self.gen_expr(init);
                    self.widen(&init_ty, &ty);
                    self.store_decl(symbol_id);
                }
            }
        }
    }

    fn store_decl(&mut self, symbol_id: crate::symtab::SymbolId) {
        let symbol = self.checked.symbols.symbol(symbol_id);
        if symbol.is_local {
            self.emit(Instr::StoreLocal { index: symbol.local_index, symbol: symbol_id });
        } else {
            let name = symbol.name.clone();
            self.emit(Instr::StoreGlobal { name, symbol: symbol_id });
        }
    }
}
