//! Expression lowering.

use subset_c_jvm_parser::ast::{AssignOp, BinOp, Expr, LogicalOp, TypeSpec, UnaryOp};

use super::IrGenerator;
use crate::ir::{Instr, TypeHint};
use crate::types::CType;

impl IrGenerator<'_> {
    /// Lower an expression; exactly one value is pushed.
    pub(crate) fn gen_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::IntLit { value, .. } => self.emit(Instr::PushInt(*value as i32)),
            Expr::CharLit { value, .. } => self.emit(Instr::PushInt(*value as i32)),
            Expr::BoolLit { value, .. } => self.emit(Instr::PushInt(i32::from(*value))),
            Expr::FloatLit { value, .. } => self.emit(Instr::PushFloat(*value)),
            Expr::StrLit { value, .. } => self.emit(Instr::PushString(value.clone())),
            Expr::Ident { .. } => self.gen_ident_load(expr),
            Expr::Binary { op, lhs, rhs, .. } => self.gen_binary(expr, *op, lhs, rhs),
            Expr::Logical { op, lhs, rhs, .. } => self.gen_logical(*op, lhs, rhs),
            Expr::Assign { op, target, value, .. } => self.gen_assign(*op, target, value, true),
            Expr::Ternary { cond, then_expr, else_expr, .. } => {
                self.gen_ternary(cond, then_expr, else_expr)
            }
            Expr::Unary { op, operand, .. } => self.gen_unary(*op, operand, expr),
            Expr::Cast { spec, operand, .. } => self.gen_cast(spec, operand),
            Expr::Call { .. } => self.gen_call(expr),
            Expr::Index { array, index, .. } => {
                self.gen_expr(array);
                self.gen_expr(index);
                self.emit(Instr::ArrayLoad { symbol: self.array_symbol(array) });
            }
            Expr::Member { object, .. } => {
                // Structs are opaque at the JVM level; member loads have no
                // runtime representation. Evaluate the object for effect
                // and push a placeholder.
                self.gen_expr(object);
                self.emit(Instr::Pop);
                self.emit(Instr::PushInt(0));
            }
        }
    }

    /// Symbol carried by array IR so the emitter can pick element opcodes.
    pub(crate) fn array_symbol(&self, array: &Expr) -> Option<crate::symtab::SymbolId> {
        match array {
            Expr::Ident { id, .. } => self.checked.binding(*id),
            _ => None,
        }
    }

    fn gen_ident_load(&mut self, expr: &Expr) {
        let Expr::Ident { id, name, .. } = expr else {
            unreachable!("gen_ident_load on non-identifier");
        };
        match self.checked.binding(*id) {
            Some(symbol_id) => {
                let symbol = self.checked.symbols.symbol(symbol_id);
                if symbol.is_local {
                    self.emit(Instr::LoadLocal { index: symbol.local_index, symbol: symbol_id });
                } else {
                    self.emit(Instr::LoadGlobal { name: name.clone(), symbol: symbol_id });
                }
            }
            // Unbound after a reported error: keep the stack shape.
            None => self.emit(Instr::PushInt(0)),
        }
    }

    fn store_symbol(&mut self, symbol_id: crate::symtab::SymbolId) {
        let symbol = self.checked.symbols.symbol(symbol_id);
        if symbol.is_local {
            self.emit(Instr::StoreLocal { index: symbol.local_index, symbol: symbol_id });
        } else {
            let name = symbol.name.clone();
            self.emit(Instr::StoreGlobal { name, symbol: symbol_id });
        }
    }

    fn load_symbol(&mut self, symbol_id: crate::symtab::SymbolId) {
        let symbol = self.checked.symbols.symbol(symbol_id);
        if symbol.is_local {
            self.emit(Instr::LoadLocal { index: symbol.local_index, symbol: symbol_id });
        } else {
            let name = symbol.name.clone();
            self.emit(Instr::LoadGlobal { name, symbol: symbol_id });
        }
    }

    fn gen_binary(&mut self, expr: &Expr, op: BinOp, lhs: &Expr, rhs: &Expr) {
        let lt = self.checked.ty(lhs.id());
        let rt = self.checked.ty(rhs.id());

        if op.is_comparison() {
            let hint = if lt.is_float() || rt.is_float() {
                TypeHint::Float
            } else {
                TypeHint::Int
            };
            let target = if hint == TypeHint::Float { CType::float() } else { CType::int() };
            self.gen_expr(lhs);
            self.widen(&lt, &target);
            self.gen_expr(rhs);
            self.widen(&rt, &target);
            self.emit(match op {
                BinOp::Eq => Instr::Eq(hint),
                BinOp::Ne => Instr::Neq(hint),
                BinOp::Lt => Instr::Lt(hint),
                BinOp::Gt => Instr::Gt(hint),
                BinOp::Le => Instr::Le(hint),
                BinOp::Ge => Instr::Ge(hint),
                _ => unreachable!(),
            });
            return;
        }

        let result = self.checked.ty(expr.id());
        let hint = Self::hint_of(&result);
        self.gen_expr(lhs);
        self.widen(&lt, &result);
        self.gen_expr(rhs);
        self.widen(&rt, &result);
        self.emit(match op {
            BinOp::Add => Instr::Add(hint),
            BinOp::Sub => Instr::Sub(hint),
            BinOp::Mul => Instr::Mul(hint),
            BinOp::Div => Instr::Div(hint),
            BinOp::Mod => Instr::Mod,
            BinOp::BitAnd => Instr::BitAnd,
            BinOp::BitOr => Instr::BitOr,
            BinOp::BitXor => Instr::BitXor,
            BinOp::Shl => Instr::Shl,
            BinOp::Shr => Instr::Shr,
            _ => unreachable!("comparisons handled above"),
        });
    }

    fn gen_logical(&mut self, op: LogicalOp, lhs: &Expr, rhs: &Expr) {
        match op {
            LogicalOp::Or => {
                self.gen_expr(lhs);
                self.emit(Instr::Dup);
                let l_end = self.fresh_label();
                self.emit(Instr::JumpIfZero(l_end.clone()));
                self.emit(Instr::Pop);
                self.emit(Instr::PushInt(1));
                let l_skip = self.fresh_label();
                self.emit(Instr::Jump(l_skip.clone()));
                self.emit(Instr::Label(l_end));
                self.emit(Instr::Pop);
                self.gen_expr(rhs);
                self.emit(Instr::Label(l_skip));
            }
            LogicalOp::And => {
                self.gen_expr(lhs);
                self.emit(Instr::Dup);
                let l_end = self.fresh_label();
                self.emit(Instr::JumpIfZero(l_end.clone()));
                self.emit(Instr::Pop);
                self.gen_expr(rhs);
                let l_skip = self.fresh_label();
                self.emit(Instr::Jump(l_skip.clone()));
                self.emit(Instr::Label(l_end));
                self.emit(Instr::Pop);
                self.emit(Instr::PushInt(0));
                self.emit(Instr::Label(l_skip));
            }
        }
    }

    fn gen_ternary(&mut self, cond: &Expr, then_expr: &Expr, else_expr: &Expr) {
        self.gen_expr(cond);
        let l_false = self.fresh_label();
        self.emit(Instr::JumpIfZero(l_false.clone()));
        self.gen_expr(then_expr);
        let l_end = self.fresh_label();
        self.emit(Instr::Jump(l_end.clone()));
        self.emit(Instr::Label(l_false));
        self.gen_expr(else_expr);
        self.emit(Instr::Label(l_end));
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr, expr: &Expr) {
        match op {
            UnaryOp::Plus => self.gen_expr(operand),
            UnaryOp::Neg => {
                let ty = self.checked.ty(expr.id());
                self.gen_expr(operand);
                self.emit(Instr::Neg(Self::hint_of(&ty)));
            }
            UnaryOp::LogicalNot => {
                // `!x` is `x == 0`.
                let ty = self.checked.ty(operand.id());
                self.gen_expr(operand);
                if ty.is_float() {
                    self.emit(Instr::PushFloat(0.0));
                    self.emit(Instr::Eq(TypeHint::Float));
                } else {
                    self.emit(Instr::PushInt(0));
                    self.emit(Instr::Eq(TypeHint::Int));
                }
            }
            UnaryOp::BitNot => {
                self.gen_expr(operand);
                self.emit(Instr::BitNot);
            }
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
                self.gen_incdec(op, operand, true);
            }
            UnaryOp::Addr | UnaryOp::Deref => {
                // Rejected by the checker; keep the stack shape.
                self.gen_expr(operand);
            }
        }
    }

    fn gen_cast(&mut self, spec: &TypeSpec, operand: &Expr) {
        let from = self.checked.ty(operand.id());
        self.gen_expr(operand);
        match spec {
            TypeSpec::Float if from.is_integral() => self.emit(Instr::CastI2F),
            TypeSpec::Int | TypeSpec::Char if from.is_float() => self.emit(Instr::CastF2I),
            _ => {}
        }
    }

    /// Pre/post increment and decrement. In expression context the pushed
    /// value is the pre-value (post forms) or the new value (pre forms).
    pub(crate) fn gen_incdec(&mut self, op: UnaryOp, operand: &Expr, need_value: bool) {
        let ty = self.checked.ty(operand.id());
        let hint = Self::hint_of(&ty);
        let is_inc = matches!(op, UnaryOp::PreInc | UnaryOp::PostInc);
        let is_post = matches!(op, UnaryOp::PostInc | UnaryOp::PostDec);

        match operand {
            Expr::Ident { id, .. } => {
                let Some(symbol_id) = self.checked.binding(*id) else {
                    if need_value {
                        self.emit(Instr::PushInt(0));
                    }
                    return;
                };
                self.load_symbol(symbol_id);
                if is_post && need_value {
                    self.emit(Instr::Dup);
                }
                self.push_one(hint);
                self.emit(if is_inc { Instr::Add(hint) } else { Instr::Sub(hint) });
                self.store_symbol(symbol_id);
                if !is_post && need_value {
                    self.load_symbol(symbol_id);
                }
            }
            Expr::Index { array, index, .. } => {
                let symbol = self.array_symbol(array);
                self.gen_expr(array);
                self.gen_expr(index);
                self.emit(Instr::Dup2);
                self.emit(Instr::ArrayLoad { symbol });
                if is_post && need_value {
                    self.emit(Instr::DupX2);
                }
                self.push_one(hint);
                self.emit(if is_inc { Instr::Add(hint) } else { Instr::Sub(hint) });
                if !is_post && need_value {
                    self.emit(Instr::DupX2);
                }
                self.emit(Instr::ArrayStore { symbol });
            }
            _ => {
                if need_value {
                    self.emit(Instr::PushInt(0));
                }
            }
        }
    }

    fn push_one(&mut self, hint: TypeHint) {
        match hint {
            TypeHint::Int => self.emit(Instr::PushInt(1)),
            TypeHint::Float => self.emit(Instr::PushFloat(1.0)),
        }
    }

    /// Assignment in either mode: expression context keeps one copy of the
    /// assigned value on the stack.
    pub(crate) fn gen_assign(&mut self, op: AssignOp, target: &Expr, value: &Expr, need_value: bool) {
        let target_ty = self.checked.ty(target.id());
        let value_ty = self.checked.ty(value.id());

        match target {
            Expr::Ident { id, .. } => {
                let Some(symbol_id) = self.checked.binding(*id) else {
                    self.gen_expr(value);
                    if !need_value {
                        self.emit(Instr::Pop);
                    }
                    return;
                };
                match op.binop() {
                    None => {
                        self.gen_expr(value);
                        self.widen(&value_ty, &target_ty);
                    }
                    Some(bin) => {
                        self.load_symbol(symbol_id);
                        self.gen_expr(value);
                        self.widen(&value_ty, &target_ty);
                        self.emit_compound_op(bin, &target_ty);
                    }
                }
                if need_value {
                    self.emit(Instr::Dup);
                }
                self.store_symbol(symbol_id);
            }
            Expr::Index { array, index, .. } => {
                let symbol = self.array_symbol(array);
                let elem_ty = target_ty;
                self.gen_expr(array);
                self.gen_expr(index);
                if let Some(bin) = op.binop() {
                    self.emit(Instr::Dup2);
                    self.emit(Instr::ArrayLoad { symbol });
                    self.gen_expr(value);
                    self.widen(&value_ty, &elem_ty);
                    self.emit_compound_op(bin, &elem_ty);
                } else {
                    self.gen_expr(value);
                    self.widen(&value_ty, &elem_ty);
                }
                if need_value {
                    self.emit(Instr::DupX2);
                }
                self.emit(Instr::ArrayStore { symbol });
            }
            _ => {
                // Member targets have no runtime field representation;
                // evaluate the value so the expression keeps its meaning.
                self.gen_expr(value);
                if !need_value {
                    self.emit(Instr::Pop);
                }
            }
        }
    }

    fn emit_compound_op(&mut self, op: BinOp, target_ty: &CType) {
        let hint = Self::hint_of(target_ty);
        self.emit(match op {
            BinOp::Add => Instr::Add(hint),
            BinOp::Sub => Instr::Sub(hint),
            BinOp::Mul => Instr::Mul(hint),
            BinOp::Div => Instr::Div(hint),
            BinOp::Mod => Instr::Mod,
            BinOp::BitAnd => Instr::BitAnd,
            BinOp::BitOr => Instr::BitOr,
            BinOp::BitXor => Instr::BitXor,
            BinOp::Shl => Instr::Shl,
            BinOp::Shr => Instr::Shr,
            _ => unreachable!("no compound comparison assignment"),
        });
    }

    /// Arguments left to right, then the call itself.
    pub(crate) fn gen_call(&mut self, expr: &Expr) {
        let Expr::Call { callee, args, .. } = expr else {
            unreachable!("gen_call on non-call");
        };
        let callee_ty = self.checked.ty(callee.id());
        let param_types: Vec<CType> = match &callee_ty.kind {
            crate::types::TypeKind::Function { params, .. } => params.clone(),
            _ => Vec::new(),
        };

        for (position, arg) in args.iter().enumerate() {
            let arg_ty = self.checked.ty(arg.id());
            self.gen_expr(arg);
            if let Some(param) = param_types.get(position) {
                self.widen(&arg_ty, param);
            }
        }

        let (name, symbol) = match callee.as_ref() {
            Expr::Ident { id, name, .. } => (name.clone(), self.checked.binding(*id)),
            _ => ("<invalid>".to_string(), None),
        };
        self.emit(Instr::Call { name, argc: args.len(), symbol });
    }
}
