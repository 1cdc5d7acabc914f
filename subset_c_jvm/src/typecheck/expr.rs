//! Expression checking.

use subset_c_jvm_parser::ast::{AssignOp, BinOp, Expr, LogicalOp, TypeSpec, UnaryOp};
use subset_c_jvm_parser::Span;

use super::TypeChecker;
use crate::symtab::SymbolKind;
use crate::types::CType;

impl TypeChecker<'_> {
    /// Compute and record the type of an expression.
    pub(crate) fn check_expr(&mut self, expr: &Expr) -> CType {
        let ty = match expr {
            Expr::IntLit { .. } => CType::int(),
            Expr::FloatLit { .. } => CType::float(),
            Expr::CharLit { .. } => CType::char_(),
            Expr::BoolLit { .. } => CType::char_(),
            Expr::StrLit { value, .. } => {
                CType::array(CType::char_().as_const(), value.len() as u32 + 1)
            }
            Expr::Ident { name, span, .. } => match self.table.lookup(name) {
                Some(id) => {
                    self.bind(expr.id(), id);
                    self.table.symbol(id).ty.clone()
                }
                None => {
                    self.error(*span, format!("Undeclared identifier '{}'", name));
                    CType::error()
                }
            },
            Expr::Binary { op, lhs, rhs, span, .. } => self.check_binary(*op, lhs, rhs, *span),
            Expr::Logical { op, lhs, rhs, span, .. } => self.check_logical(*op, lhs, rhs, *span),
            Expr::Assign { op, target, value, span, .. } => {
                self.check_assign(*op, target, value, *span)
            }
            Expr::Ternary { cond, then_expr, else_expr, .. } => {
                self.check_expr(cond);
                let then_ty = self.check_expr(then_expr);
                self.check_expr(else_expr);
                then_ty
            }
            Expr::Unary { op, operand, span, .. } => self.check_unary(*op, operand, *span),
            Expr::Cast { spec, operand, span, .. } => self.check_cast(spec, operand, *span),
            Expr::Call { callee, args, span, .. } => self.check_call(callee, args, *span),
            Expr::Index { array, index, span, .. } => self.check_index(array, index, *span),
            Expr::Member { object, field, span, .. } => self.check_member(object, field, *span),
        };
        self.record(expr.id(), ty)
    }

    fn check_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, span: Span) -> CType {
        let lt = self.check_expr(lhs);
        let rt = self.check_expr(rhs);
        if lt.is_error() || rt.is_error() {
            return CType::error();
        }

        if op.is_comparison() {
            if !lt.is_scalar() || !rt.is_scalar() {
                self.error(
                    span,
                    format!("Operator '{}' requires scalar operands", op_symbol(op)),
                );
                return CType::error();
            }
            return CType::char_();
        }

        if op.is_integral_only() {
            if !lt.is_integral() || !rt.is_integral() {
                self.error(
                    span,
                    format!("Operator '{}' requires integral operands", op_symbol(op)),
                );
                return CType::error();
            }
            return CType::int();
        }

        // Arithmetic: both char, or both numeric.
        if lt.is_char() && rt.is_char() {
            return CType::char_();
        }
        if lt.is_numeric() && rt.is_numeric() {
            if lt.is_float() || rt.is_float() {
                return CType::float();
            }
            return CType::int();
        }
        self.error(
            span,
            format!("Operator '{}' requires numeric operands", op_symbol(op)),
        );
        CType::error()
    }

    fn check_logical(&mut self, op: LogicalOp, lhs: &Expr, rhs: &Expr, span: Span) -> CType {
        let lt = self.check_expr(lhs);
        let rt = self.check_expr(rhs);
        for ty in [&lt, &rt] {
            if !ty.is_error() && !ty.is_scalar() {
                let symbol = match op {
                    LogicalOp::And => "&&",
                    LogicalOp::Or => "||",
                };
                self.error(
                    span,
                    format!("Operator '{}' requires scalar operands", symbol),
                );
                return CType::error();
            }
        }
        CType::char_()
    }

    fn check_assign(&mut self, op: AssignOp, target: &Expr, value: &Expr, span: Span) -> CType {
        let tt = self.check_expr(target);
        let vt = self.check_expr(value);

        if !is_lvalue(target) {
            self.error(span, "Target of assignment is not an lvalue");
            return CType::error();
        }
        if tt.is_error() || vt.is_error() {
            return CType::error();
        }
        if tt.is_void() || vt.is_void() {
            self.error(span, "Void value in assignment");
            return CType::error();
        }
        if tt.is_const {
            self.error(
                span,
                format!("Assignment to read-only variable '{}'", lvalue_name(target)),
            );
            return CType::error();
        }

        let compatible = match op {
            AssignOp::Assign => {
                if tt.is_array() || tt.is_struct() {
                    tt.same_type(&vt)
                } else {
                    vt.widens_to(&tt)
                }
            }
            AssignOp::Add | AssignOp::Sub => {
                if tt.is_array() {
                    // Pointer-style adjustment of the array reference.
                    vt.is_integral()
                } else {
                    vt.widens_to(&tt)
                }
            }
            AssignOp::Mul | AssignOp::Div => !tt.is_array() && vt.widens_to(&tt),
            AssignOp::Mod
            | AssignOp::BitAnd
            | AssignOp::BitOr
            | AssignOp::BitXor
            | AssignOp::Shl
            | AssignOp::Shr => tt.is_integral() && vt.is_integral(),
        };
        if !compatible {
            self.error(span, "Incompatible types in assignment");
            return CType::error();
        }

        let mut result = tt;
        result.is_const = false;
        result
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) -> CType {
        let ot = self.check_expr(operand);
        if ot.is_error() {
            return CType::error();
        }
        match op {
            UnaryOp::Plus | UnaryOp::Neg => {
                if !ot.is_numeric() && !ot.is_char() {
                    let symbol = if op == UnaryOp::Neg { "-" } else { "+" };
                    self.error(
                        span,
                        format!("Operator '{}' requires a numeric operand", symbol),
                    );
                    return CType::error();
                }
                let mut result = ot;
                result.is_const = false;
                result
            }
            UnaryOp::LogicalNot => {
                if !ot.is_scalar() {
                    self.error(span, "Operator '!' requires a scalar operand");
                    return CType::error();
                }
                CType::char_()
            }
            UnaryOp::BitNot => {
                if !ot.is_integral() {
                    self.error(span, "Operator '~' requires an integral operand");
                    return CType::error();
                }
                CType::int()
            }
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
                let verb = match op {
                    UnaryOp::PreInc | UnaryOp::PostInc => "Increment",
                    _ => "Decrement",
                };
                if !is_lvalue(operand) {
                    self.error(span, format!("{} target is not an lvalue", verb));
                    return CType::error();
                }
                if ot.is_const {
                    self.error(
                        span,
                        format!("{} of read-only variable '{}'", verb, lvalue_name(operand)),
                    );
                    return CType::error();
                }
                if !ot.is_scalar() {
                    self.error(span, format!("{} requires a scalar operand", verb));
                    return CType::error();
                }
                ot
            }
            UnaryOp::Addr | UnaryOp::Deref => {
                let symbol = if op == UnaryOp::Addr { "&" } else { "*" };
                self.error(
                    span,
                    format!("Pointer operator '{}' is not supported", symbol),
                );
                CType::error()
            }
        }
    }

    fn check_cast(&mut self, spec: &TypeSpec, operand: &Expr, span: Span) -> CType {
        let ot = self.check_expr(operand);
        let target = self.resolve_spec(spec, span);
        if !ot.is_error() && !ot.is_scalar() {
            self.error(span, "Cannot cast a non-scalar value");
            return CType::error();
        }
        target
    }

    fn check_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> CType {
        let Expr::Ident { name, .. } = callee else {
            for arg in args {
                self.check_expr(arg);
            }
            self.error(span, "Called object is not a function");
            return CType::error();
        };

        let Some(id) = self.table.lookup(name) else {
            for arg in args {
                self.check_expr(arg);
            }
            self.error(span, format!("Undeclared identifier '{}'", name));
            self.record(callee.id(), CType::error());
            return CType::error();
        };

        let (kind, fn_ty) = {
            let symbol = self.table.symbol(id);
            (symbol.kind, symbol.ty.clone())
        };
        if kind != SymbolKind::Function || !fn_ty.is_function() {
            for arg in args {
                self.check_expr(arg);
            }
            self.error(span, format!("Called object '{}' is not a function", name));
            self.record(callee.id(), CType::error());
            return CType::error();
        }

        self.bind(callee.id(), id);
        self.record(callee.id(), fn_ty.clone());

        let crate::types::TypeKind::Function { ret, params } = fn_ty.kind else {
            unreachable!("checked above");
        };

        if params.len() != args.len() {
            self.error(span, format!("Wrong number of arguments to '{}'", name));
            for arg in args {
                self.check_expr(arg);
            }
            return (*ret).clone();
        }

        for (position, (arg, param)) in args.iter().zip(&params).enumerate() {
            let at = self.check_expr(arg);
            if at.is_error() || param.is_error() {
                continue;
            }
            let compatible = if param.is_array() || param.is_struct() {
                at.same_type(param)
            } else {
                !at.is_void() && at.widens_to(param)
            };
            if !compatible {
                self.error(
                    arg.span(),
                    format!("Incompatible argument {} to '{}'", position + 1, name),
                );
            }
        }
        (*ret).clone()
    }

    fn check_index(&mut self, array: &Expr, index: &Expr, span: Span) -> CType {
        let at = self.check_expr(array);
        let it = self.check_expr(index);
        if !it.is_error() && !it.is_integral() {
            self.error(span, "Array index must be integral");
        }
        if at.is_error() {
            return CType::error();
        }
        match at.elem() {
            Some(elem) => elem.clone(),
            None => {
                self.error(span, "Subscripted value is not an array");
                CType::error()
            }
        }
    }

    fn check_member(&mut self, object: &Expr, field: &str, span: Span) -> CType {
        let ot = self.check_expr(object);
        if ot.is_error() {
            return CType::error();
        }
        if !ot.is_struct() {
            self.error(span, "Member access on non-struct value");
            return CType::error();
        }
        match ot.member(field) {
            Some(member) => {
                let ty = member.ty.clone();
                if ot.is_const {
                    ty.as_const()
                } else {
                    ty
                }
            }
            None => {
                let struct_name = match &ot.kind {
                    crate::types::TypeKind::Struct { name, .. } => name.clone(),
                    _ => unreachable!(),
                };
                self.error(
                    span,
                    format!("No member '{}' in struct '{}'", field, struct_name),
                );
                CType::error()
            }
        }
    }
}

/// Expressions whose storage can be assigned through.
fn is_lvalue(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Ident { .. } | Expr::Index { .. } | Expr::Member { .. }
    )
}

/// Best-effort name of an lvalue for const-violation messages.
fn lvalue_name(expr: &Expr) -> String {
    match expr {
        Expr::Ident { name, .. } => name.clone(),
        Expr::Index { array, .. } => lvalue_name(array),
        Expr::Member { field, .. } => field.clone(),
        _ => "expression".to_string(),
    }
}

fn op_symbol(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::BitAnd => "&",
        BinOp::BitOr => "|",
        BinOp::BitXor => "^",
        BinOp::Shl => "<<",
        BinOp::Shr => ">>",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::Lt => "<",
        BinOp::Gt => ">",
        BinOp::Le => "<=",
        BinOp::Ge => ">=",
    }
}
