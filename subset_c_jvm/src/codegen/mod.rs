//! Jasmin class file emission.
//!
//! Walks the top-level declarations in three passes (static fields for
//! globals, a `<clinit>` allocating global arrays, then the user methods)
//! and finishes with the default constructor and the Java entry-point
//! trampoline. Per-instruction translation lives in `instr.rs`.

mod instr;

use subset_c_jvm_parser::ast::{Item, Program};

use crate::ir::{IrFunction, LabelSeq};
use crate::typecheck::Checked;
use crate::types::{CType, TypeKind};

/// Operand stack and local slots budget of emitted methods; generous upper
/// bound for anything the grammar can produce.
const FRAME_BUDGET: u32 = 32;

pub(crate) struct JasminEmitter<'a> {
    checked: &'a Checked,
    class_name: &'a str,
    labels: &'a mut LabelSeq,
    out: String,
}

/// Emit the whole class. `functions` holds the lowered IR of the program's
/// function items, in order.
pub fn emit(
    program: &Program,
    checked: &Checked,
    functions: &[IrFunction],
    class_name: &str,
    labels: &mut LabelSeq,
) -> String {
    let mut emitter = JasminEmitter {
        checked,
        class_name,
        labels,
        out: String::new(),
    };
    emitter.emit_class(program, functions);
    emitter.out
}

impl JasminEmitter<'_> {
    // ==================== Writer helpers ====================

    pub(crate) fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub(crate) fn instr_line(&mut self, text: &str) {
        self.out.push_str("    ");
        self.line(text);
    }

    pub(crate) fn label_line(&mut self, label: &str) {
        self.out.push_str(label);
        self.line(":");
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    // ==================== Class layout ====================

    fn emit_class(&mut self, program: &Program, functions: &[IrFunction]) {
        self.line(&format!(".class public {}", self.class_name));
        self.line(".super java/lang/Object");

        let globals: Vec<(&str, CType)> = program
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Decl(decl) => Some((decl.name.as_str(), self.checked.ty(decl.id))),
                _ => None,
            })
            .collect();

        if !globals.is_empty() {
            self.blank();
            for (name, ty) in &globals {
                self.line(&format!(".field public static {} {}", name, ty.descriptor()));
            }
        }

        let global_arrays: Vec<(&str, CType)> = globals
            .iter()
            .filter(|(_, ty)| ty.is_array())
            .cloned()
            .collect();
        if !global_arrays.is_empty() {
            self.emit_clinit(&global_arrays);
        }

        let mut has_main = false;
        let mut ir_iter = functions.iter();
        for item in &program.items {
            let Item::Function(func) = item else { continue };
            let Some(ir) = ir_iter.next() else { break };
            if func.name == "main" {
                has_main = true;
            }
            self.emit_method(ir);
        }

        self.emit_init_method();
        if has_main {
            self.emit_java_main();
        }
    }

    /// Static initializer allocating every global array.
    fn emit_clinit(&mut self, arrays: &[(&str, CType)]) {
        self.blank();
        self.line(".method static <clinit> : ()V");
        self.line(&format!(".code stack {} locals {}", FRAME_BUDGET, FRAME_BUDGET));
        for (name, ty) in arrays {
            let TypeKind::Array { elem, size } = &ty.kind else {
                continue;
            };
            self.emit_push_int(*size as i32);
            self.instr_line(&format!("newarray {}", newarray_kind(elem)));
            self.instr_line(&format!(
                "putstatic Field {} {} {}",
                self.class_name, name, ty.descriptor()
            ));
        }
        self.instr_line("return");
        self.line(".end code");
        self.line(".end method");
    }

    /// One user function as a static method.
    fn emit_method(&mut self, ir: &IrFunction) {
        let fn_ty = self.checked.symbols.symbol(ir.symbol).ty.clone();
        let ret = match &fn_ty.kind {
            TypeKind::Function { ret, .. } => (**ret).clone(),
            _ => CType::int(),
        };

        self.blank();
        self.line(&format!(
            ".method public static {} : {}",
            ir.name,
            fn_ty.method_descriptor()
        ));
        self.line(&format!(".code stack {} locals {}", FRAME_BUDGET, FRAME_BUDGET));
        for instr in &ir.instrs {
            self.emit_instr(instr, &ret);
        }
        if !ir.instrs.last().is_some_and(|i| i.is_return()) {
            self.emit_fallback_return(&ret);
        }
        self.line(".end code");
        self.line(".end method");
    }

    /// Safety net for control flow that can fall off the end of a body.
    fn emit_fallback_return(&mut self, ret: &CType) {
        match &ret.kind {
            TypeKind::Void => self.instr_line("return"),
            TypeKind::Float => {
                self.instr_line("fconst_0");
                self.instr_line("freturn");
            }
            TypeKind::Array { .. } | TypeKind::Struct { .. } => {
                self.instr_line("aconst_null");
                self.instr_line("areturn");
            }
            _ => {
                self.instr_line("iconst_0");
                self.instr_line("ireturn");
            }
        }
    }

    fn emit_init_method(&mut self) {
        self.blank();
        self.line(".method <init> : ()V");
        self.line(".code stack 1 locals 1");
        self.instr_line("aload_0");
        self.instr_line("invokespecial Method java/lang/Object <init> ()V");
        self.instr_line("return");
        self.line(".end code");
        self.line(".end method");
    }

    /// `main([Ljava/lang/String;)V` trampoline into the user's `main()I`,
    /// passing the result to `System.exit`.
    fn emit_java_main(&mut self) {
        self.blank();
        self.line(".method public static main : ([Ljava/lang/String;)V");
        self.line(".code stack 1 locals 1");
        self.instr_line(&format!("invokestatic Method {} main ()I", self.class_name));
        self.instr_line("invokestatic Method java/lang/System exit (I)V");
        self.instr_line("return");
        self.line(".end code");
        self.line(".end method");
    }
}

/// `newarray` operand for a primitive element type.
pub(crate) fn newarray_kind(elem: &CType) -> &'static str {
    match elem.kind {
        TypeKind::Char => "char",
        TypeKind::Float => "float",
        _ => "int",
    }
}
