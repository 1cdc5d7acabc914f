//! Lowering: typed AST → stack IR.
//!
//! One [`IrGenerator`] runs per function. Expressions push exactly one
//! value; statements leave the operand stack empty. Assignments and
//! increment/decrement come in two modes: expression context keeps a copy
//! of the assigned value on the stack, statement context does not, so no
//! residual values need popping afterwards.
//!
//! Control flow uses labels from the per-compilation [`LabelSeq`]; the
//! innermost loop's break/continue targets live on a lexical loop stack.
//! The generator assumes a checked AST. Where a type or binding is missing
//! after a reported error it emits best-effort placeholder IR; the caller
//! treats the whole compilation as failed anyway.

mod expr;
mod stmt;

use subset_c_jvm_parser::ast::Function;

use crate::ir::{Instr, IrFunction, LabelSeq, TypeHint};
use crate::symtab::SymbolId;
use crate::typecheck::Checked;
use crate::types::CType;

/// Break and continue targets of one enclosing loop.
#[derive(Debug, Clone)]
pub(crate) struct LoopLabels {
    pub break_label: String,
    pub continue_label: String,
}

pub(crate) struct IrGenerator<'a> {
    checked: &'a Checked,
    labels: &'a mut LabelSeq,
    instrs: Vec<Instr>,
    loop_stack: Vec<LoopLabels>,
    return_type: CType,
}

/// Lower one function body to IR.
pub fn lower_function(func: &Function, checked: &Checked, labels: &mut LabelSeq) -> IrFunction {
    let symbol = checked.binding(func.id).unwrap_or(SymbolId(0));
    let return_type = match &checked.ty(func.id).kind {
        crate::types::TypeKind::Function { ret, .. } => (**ret).clone(),
        _ => CType::error(),
    };

    let mut generator = IrGenerator {
        checked,
        labels,
        instrs: Vec::new(),
        loop_stack: Vec::new(),
        return_type,
    };
    for stmt in &func.body.stmts {
        generator.gen_stmt(stmt);
    }
    IrFunction {
        name: func.name.clone(),
        symbol,
        instrs: generator.instrs,
    }
}

impl IrGenerator<'_> {
    pub(crate) fn emit(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    pub(crate) fn fresh_label(&mut self) -> String {
        self.labels.next()
    }

    /// Operand-kind hint for a type.
    pub(crate) fn hint_of(ty: &CType) -> TypeHint {
        if ty.is_float() {
            TypeHint::Float
        } else {
            TypeHint::Int
        }
    }

    /// Emit the implicit int-to-float conversion when a value of type
    /// `from` flows into a position of type `to`.
    pub(crate) fn widen(&mut self, from: &CType, to: &CType) {
        if from.is_integral() && to.is_float() {
            self.emit(Instr::CastI2F);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use subset_c_jvm_parser::ast::Item;
    use subset_c_jvm_parser::parse;

    use super::*;
    use crate::typecheck;

    fn lower_all(source: &str) -> Vec<IrFunction> {
        let program = parse(source).expect("parse failed");
        let checked = typecheck::check(&program, "test.c");
        assert!(checked.is_ok(), "{:?}", checked.diagnostics);
        let mut labels = LabelSeq::new();
        program
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Function(f) => Some(lower_function(f, &checked, &mut labels)),
                _ => None,
            })
            .collect()
    }

    fn lower_main(body: &str) -> IrFunction {
        lower_all(&format!("int main() {{ {} }}", body))
            .into_iter()
            .next()
            .unwrap()
    }

    /// Every jump target must exist as a label in the same function, and no
    /// label may repeat.
    fn assert_labels_wellformed(func: &IrFunction) {
        let mut defined = HashSet::new();
        for instr in &func.instrs {
            if let Instr::Label(l) = instr {
                assert!(defined.insert(l.clone()), "duplicate label {}", l);
            }
        }
        for instr in &func.instrs {
            if let Instr::Jump(l) | Instr::JumpIfZero(l) = instr {
                assert!(defined.contains(l), "jump to undefined label {}", l);
            }
        }
    }

    #[test]
    fn test_arithmetic_expression_order() {
        let func = lower_main("return 1 + 2 * 3;");
        assert_eq!(
            func.instrs,
            vec![
                Instr::PushInt(1),
                Instr::PushInt(2),
                Instr::PushInt(3),
                Instr::Mul(TypeHint::Int),
                Instr::Add(TypeHint::Int),
                Instr::Return,
            ]
        );
    }

    #[test]
    fn test_local_load_store() {
        let func = lower_main("int x; x = 5; return x;");
        let expected_stores = func
            .instrs
            .iter()
            .filter(|i| matches!(i, Instr::StoreLocal { index: 0, .. }))
            .count();
        assert_eq!(expected_stores, 1);
        assert!(func
            .instrs
            .iter()
            .any(|i| matches!(i, Instr::LoadLocal { index: 0, .. })));
        // Statement-context assignment leaves nothing to pop.
        assert!(!func.instrs.contains(&Instr::Pop));
        assert!(!func.instrs.contains(&Instr::Dup));
    }

    #[test]
    fn test_assignment_in_expression_context_dups() {
        let func = lower_main("int x; int y; y = x = 3; return y;");
        // The inner assignment is in expression context and keeps a copy.
        assert!(func.instrs.contains(&Instr::Dup));
    }

    #[test]
    fn test_short_circuit_or_shape() {
        let func = lower_main("if (0 || 1) return 10; return 20;");
        assert_labels_wellformed(&func);
        let head: Vec<&Instr> = func.instrs.iter().take(10).collect();
        assert_eq!(
            head,
            vec![
                &Instr::PushInt(0),
                &Instr::Dup,
                &Instr::JumpIfZero("L0".to_string()),
                &Instr::Pop,
                &Instr::PushInt(1),
                &Instr::Jump("L1".to_string()),
                &Instr::Label("L0".to_string()),
                &Instr::Pop,
                &Instr::PushInt(1),
                &Instr::Label("L1".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_circuit_and_shape() {
        let func = lower_main("int a; a = 1; return a && 0;");
        assert_labels_wellformed(&func);
        assert!(matches!(func.instrs[2], Instr::LoadLocal { index: 0, .. }));
        let tail: Vec<Instr> = func.instrs[3..].to_vec();
        assert_eq!(
            tail,
            vec![
                Instr::Dup,
                Instr::JumpIfZero("L0".to_string()),
                Instr::Pop,
                Instr::PushInt(0),
                Instr::Jump("L1".to_string()),
                Instr::Label("L0".to_string()),
                Instr::Pop,
                Instr::PushInt(0),
                Instr::Label("L1".to_string()),
                Instr::Return,
            ]
        );
    }

    #[test]
    fn test_while_with_continue_targets() {
        let func = lower_main(
            "int i; int s; i = 0; s = 0;\
             while (i < 10) { i = i + 1; if (i == 5) continue; s = s + i; }\
             return s;",
        );
        assert_labels_wellformed(&func);
        // Continue jumps to the loop head label.
        let head_label = func
            .instrs
            .iter()
            .find_map(|i| match i {
                Instr::Label(l) => Some(l.clone()),
                _ => None,
            })
            .unwrap();
        let jumps_to_head = func
            .instrs
            .iter()
            .filter(|i| matches!(i, Instr::Jump(l) if *l == head_label))
            .count();
        // One from the continue, one from the loop back edge.
        assert_eq!(jumps_to_head, 2);
    }

    #[test]
    fn test_do_while_continue_targets_condition() {
        let func = lower_main("int i; i = 0; do { i++; continue; } while (i < 3); return i;");
        assert_labels_wellformed(&func);
    }

    #[test]
    fn test_for_loop_shape() {
        let func = lower_main("int s; s = 0; for (int i = 0; i < 3; i++) s = s + i; return s;");
        assert_labels_wellformed(&func);
        // Post expression runs in statement context: its value is not kept.
        assert!(!func.instrs.contains(&Instr::Pop));
    }

    #[test]
    fn test_ternary_shape() {
        let func = lower_main("int x; x = 1; return x ? 10 : 20;");
        assert_labels_wellformed(&func);
        assert!(func.instrs.iter().any(|i| matches!(i, Instr::JumpIfZero(_))));
    }

    #[test]
    fn test_array_store_and_load() {
        let func = lower_main("int a[5]; a[2] = 7; return a[2];");
        assert!(func.instrs.contains(&Instr::PushInt(5)));
        assert!(func
            .instrs
            .iter()
            .any(|i| matches!(i, Instr::AllocArray { .. })));
        assert!(func
            .instrs
            .iter()
            .any(|i| matches!(i, Instr::ArrayStore { symbol: Some(_) })));
        assert!(func
            .instrs
            .iter()
            .any(|i| matches!(i, Instr::ArrayLoad { symbol: Some(_) })));
    }

    #[test]
    fn test_compound_array_assignment_shape() {
        let func = lower_main("int a[3]; a[0] = 1; a[0] += 2; return a[0];");
        assert!(func.instrs.contains(&Instr::Dup2));
    }

    #[test]
    fn test_post_increment_statement_has_no_dup() {
        let func = lower_main("int i; i = 0; i++; return i;");
        assert!(!func.instrs.contains(&Instr::Dup));
    }

    #[test]
    fn test_post_increment_expression_keeps_old_value() {
        let func = lower_main("int i; int j; i = 0; j = i++; return j;");
        assert!(func.instrs.contains(&Instr::Dup));
    }

    #[test]
    fn test_void_call_statement_has_no_pop() {
        let func = lower_main("putint(42); return 0;");
        assert_eq!(func.instrs.len(), 4);
        assert_eq!(func.instrs[0], Instr::PushInt(42));
        assert!(matches!(
            &func.instrs[1],
            Instr::Call { name, argc: 1, symbol: Some(_) } if name == "putint"
        ));
        assert_eq!(func.instrs[2], Instr::PushInt(0));
        assert_eq!(func.instrs[3], Instr::Return);
    }

    #[test]
    fn test_non_void_call_statement_pops() {
        let func = lower_main("putchar(65); return 0;");
        assert!(func.instrs.contains(&Instr::Pop));
    }

    #[test]
    fn test_int_widens_to_float_in_assignment() {
        let func = lower_main("float f; f = 1; return 0;");
        assert!(func.instrs.contains(&Instr::CastI2F));
    }

    #[test]
    fn test_float_arithmetic_hint() {
        let func = lower_all(
            "float half(float x) { return x / 2.0; } int main() { return 0; }",
        )
        .remove(0);
        assert!(func.instrs.contains(&Instr::Div(TypeHint::Float)));
    }

    #[test]
    fn test_char_array_string_initializer() {
        let func = lower_main("char s[] = \"hi\"; return 0;");
        assert!(func
            .instrs
            .contains(&Instr::PushString("hi".to_string())));
    }

    #[test]
    fn test_labels_unique_across_functions() {
        let funcs = lower_all(
            "int f() { int i; i = 0; while (i < 2) i = i + 1; return i; }\
             int main() { int j; j = 0; while (j < 3) j = j + 1; return f() + j; }",
        );
        let mut all = HashSet::new();
        for func in &funcs {
            for instr in &func.instrs {
                if let Instr::Label(l) = instr {
                    assert!(all.insert(l.clone()), "label {} reused across functions", l);
                }
            }
        }
    }
}
