//! IR instruction → Jasmin lines.

use super::{newarray_kind, JasminEmitter};
use crate::ir::{Instr, TypeHint};
use crate::stdlib;
use crate::symtab::SymbolId;
use crate::types::{CType, TypeKind};

impl JasminEmitter<'_> {
    pub(crate) fn emit_instr(&mut self, instr: &Instr, method_ret: &CType) {
        match instr {
            Instr::Nop => self.instr_line("nop"),
            Instr::Label(label) => self.label_line(label),
            Instr::Jump(label) => self.instr_line(&format!("goto {}", label)),
            Instr::JumpIfZero(label) => self.instr_line(&format!("ifeq {}", label)),

            Instr::LoadGlobal { name, symbol } => {
                let desc = self.symbol_descriptor(*symbol);
                self.instr_line(&format!(
                    "getstatic Field {} {} {}",
                    self.class_name, name, desc
                ));
            }
            Instr::StoreGlobal { name, symbol } => {
                let desc = self.symbol_descriptor(*symbol);
                self.instr_line(&format!(
                    "putstatic Field {} {} {}",
                    self.class_name, name, desc
                ));
            }
            Instr::LoadLocal { index, symbol } => {
                let prefix = self.local_prefix(*symbol);
                self.emit_slot_op(prefix, "load", *index);
            }
            Instr::StoreLocal { index, symbol } => {
                let prefix = self.local_prefix(*symbol);
                self.emit_slot_op(prefix, "store", *index);
            }

            Instr::PushInt(value) => self.emit_push_int(*value),
            Instr::PushFloat(value) => self.instr_line(&format!("ldc {:?}", value)),
            Instr::PushString(value) => {
                self.instr_line(&format!("ldc \"{}\"", escape_string(value)));
                self.instr_line(stdlib::JAVA2C_CALL);
            }

            Instr::Add(hint) => self.emit_arith(*hint, "add"),
            Instr::Sub(hint) => self.emit_arith(*hint, "sub"),
            Instr::Mul(hint) => self.emit_arith(*hint, "mul"),
            Instr::Div(hint) => self.emit_arith(*hint, "div"),
            Instr::Mod => self.instr_line("irem"),
            Instr::Neg(hint) => self.emit_arith(*hint, "neg"),
            Instr::BitAnd => self.instr_line("iand"),
            Instr::BitOr => self.instr_line("ior"),
            Instr::BitXor => self.instr_line("ixor"),
            Instr::BitNot => {
                // No JVM opcode; xor against all ones.
                self.instr_line("iconst_m1");
                self.instr_line("ixor");
            }
            Instr::Shl => self.instr_line("ishl"),
            Instr::Shr => self.instr_line("ishr"),

            Instr::Eq(hint) => self.emit_comparison(*hint, "eq"),
            Instr::Neq(hint) => self.emit_comparison(*hint, "ne"),
            Instr::Lt(hint) => self.emit_comparison(*hint, "lt"),
            Instr::Gt(hint) => self.emit_comparison(*hint, "gt"),
            Instr::Le(hint) => self.emit_comparison(*hint, "le"),
            Instr::Ge(hint) => self.emit_comparison(*hint, "ge"),

            Instr::Call { name, argc, symbol } => self.emit_call(name, *argc, *symbol),

            Instr::Return => match &method_ret.kind {
                TypeKind::Float => self.instr_line("freturn"),
                TypeKind::Array { .. } | TypeKind::Struct { .. } => self.instr_line("areturn"),
                _ => self.instr_line("ireturn"),
            },
            Instr::ReturnVoid => self.instr_line("return"),

            Instr::Pop => self.instr_line("pop"),
            Instr::Dup => self.instr_line("dup"),
            Instr::Dup2 => self.instr_line("dup2"),
            Instr::DupX2 => self.instr_line("dup_x2"),

            Instr::CastI2F => self.instr_line("i2f"),
            Instr::CastF2I => self.instr_line("f2i"),
            Instr::CastI2D => self.instr_line("i2d"),
            Instr::CastD2I => self.instr_line("d2i"),
            Instr::CastF2D => self.instr_line("f2d"),
            Instr::CastD2F => self.instr_line("d2f"),

            Instr::ArrayLoad { symbol } => {
                let prefix = self.element_prefix(*symbol);
                self.instr_line(&format!("{}aload", prefix));
            }
            Instr::ArrayStore { symbol } => {
                let prefix = self.element_prefix(*symbol);
                self.instr_line(&format!("{}astore", prefix));
            }
            Instr::AllocArray { symbol } => {
                let elem = self
                    .symbol_type(*symbol)
                    .elem()
                    .cloned()
                    .unwrap_or_else(CType::int);
                self.instr_line(&format!("newarray {}", newarray_kind(&elem)));
            }
        }
    }

    /// Shortest push encoding for an int constant.
    pub(crate) fn emit_push_int(&mut self, value: i32) {
        let text = if value == -1 {
            "iconst_m1".to_string()
        } else if (0..=5).contains(&value) {
            format!("iconst_{}", value)
        } else if (-128..=127).contains(&value) {
            format!("bipush {}", value)
        } else if (-32768..=32767).contains(&value) {
            format!("sipush {}", value)
        } else {
            format!("ldc {}", value)
        };
        self.instr_line(&text);
    }

    fn emit_arith(&mut self, hint: TypeHint, op: &str) {
        let prefix = match hint {
            TypeHint::Int => 'i',
            TypeHint::Float => 'f',
        };
        self.instr_line(&format!("{}{}", prefix, op));
    }

    /// Comparisons materialize a boolean through a branch pair; float
    /// operands go through `fcmpl` first.
    fn emit_comparison(&mut self, hint: TypeHint, cc: &str) {
        let l_true = self.fresh_label();
        let l_end = self.fresh_label();
        match hint {
            TypeHint::Int => self.instr_line(&format!("if_icmp{} {}", cc, l_true)),
            TypeHint::Float => {
                self.instr_line("fcmpl");
                self.instr_line(&format!("if{} {}", cc, l_true));
            }
        }
        self.instr_line("iconst_0");
        self.instr_line(&format!("goto {}", l_end));
        self.label_line(&l_true);
        self.instr_line("iconst_1");
        self.label_line(&l_end);
    }

    fn emit_call(&mut self, name: &str, argc: usize, symbol: Option<SymbolId>) {
        if let Some(desc) = stdlib::CALL_DESCRIPTORS.get(name) {
            self.instr_line(&format!(
                "invokestatic Method {} {} {}",
                stdlib::RUNTIME_CLASS,
                name,
                desc
            ));
            return;
        }
        let desc = match symbol {
            Some(id) => self.symbol_type(id).method_descriptor(),
            None => format!("({})I", "I".repeat(argc)),
        };
        self.instr_line(&format!(
            "invokestatic Method {} {} {}",
            self.class_name, name, desc
        ));
    }

    fn emit_slot_op(&mut self, prefix: char, op: &str, index: usize) {
        if index <= 3 {
            self.instr_line(&format!("{}{}_{}", prefix, op, index));
        } else {
            self.instr_line(&format!("{}{} {}", prefix, op, index));
        }
    }

    fn fresh_label(&mut self) -> String {
        self.labels.next()
    }

    // ==================== Type lookups ====================

    fn symbol_type(&self, id: SymbolId) -> CType {
        self.checked.symbols.symbol(id).ty.clone()
    }

    fn symbol_descriptor(&self, id: SymbolId) -> String {
        self.symbol_type(id).descriptor()
    }

    /// Load/store opcode family for a local's type.
    fn local_prefix(&self, id: SymbolId) -> char {
        match self.symbol_type(id).kind {
            TypeKind::Float => 'f',
            TypeKind::Array { .. } | TypeKind::Struct { .. } => 'a',
            _ => 'i',
        }
    }

    /// Element opcode family recovered from the accessed array's symbol.
    fn element_prefix(&self, id: Option<SymbolId>) -> char {
        let Some(id) = id else { return 'i' };
        match self.symbol_type(id).elem().map(|e| &e.kind) {
            Some(TypeKind::Char) => 'c',
            Some(TypeKind::Float) => 'f',
            _ => 'i',
        }
    }
}

/// Escape a string literal for a Jasmin `ldc` line.
fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
