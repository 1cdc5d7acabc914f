//! Readable IR dumps for debugging and test output.

use std::fmt;

use super::{Instr, IrFunction, TypeHint};

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Int => write!(f, "i"),
            TypeHint::Float => write!(f, "f"),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Nop => write!(f, "NOP"),
            Instr::Label(l) => write!(f, "LABEL {}", l),
            Instr::Jump(l) => write!(f, "JUMP {}", l),
            Instr::JumpIfZero(l) => write!(f, "JUMP_IF_ZERO {}", l),
            Instr::LoadGlobal { name, .. } => write!(f, "LOAD_GLOBAL {}", name),
            Instr::StoreGlobal { name, .. } => write!(f, "STORE_GLOBAL {}", name),
            Instr::LoadLocal { index, .. } => write!(f, "LOAD_LOCAL {}", index),
            Instr::StoreLocal { index, .. } => write!(f, "STORE_LOCAL {}", index),
            Instr::PushInt(v) => write!(f, "PUSH_INT {}", v),
            Instr::PushFloat(v) => write!(f, "PUSH_FLOAT {:?}", v),
            Instr::PushString(s) => write!(f, "PUSH_STRING {:?}", s),
            Instr::Add(h) => write!(f, "ADD.{}", h),
            Instr::Sub(h) => write!(f, "SUB.{}", h),
            Instr::Mul(h) => write!(f, "MUL.{}", h),
            Instr::Div(h) => write!(f, "DIV.{}", h),
            Instr::Mod => write!(f, "MOD"),
            Instr::Neg(h) => write!(f, "NEG.{}", h),
            Instr::BitAnd => write!(f, "BIT_AND"),
            Instr::BitOr => write!(f, "BIT_OR"),
            Instr::BitXor => write!(f, "BIT_XOR"),
            Instr::BitNot => write!(f, "BIT_NOT"),
            Instr::Shl => write!(f, "SHL"),
            Instr::Shr => write!(f, "SHR"),
            Instr::Eq(h) => write!(f, "EQ.{}", h),
            Instr::Neq(h) => write!(f, "NEQ.{}", h),
            Instr::Lt(h) => write!(f, "LT.{}", h),
            Instr::Gt(h) => write!(f, "GT.{}", h),
            Instr::Le(h) => write!(f, "LE.{}", h),
            Instr::Ge(h) => write!(f, "GE.{}", h),
            Instr::Call { name, argc, .. } => write!(f, "CALL {} (argc={})", name, argc),
            Instr::Return => write!(f, "RETURN"),
            Instr::ReturnVoid => write!(f, "RETURN_VOID"),
            Instr::Pop => write!(f, "POP"),
            Instr::Dup => write!(f, "DUP"),
            Instr::Dup2 => write!(f, "DUP2"),
            Instr::DupX2 => write!(f, "DUP_X2"),
            Instr::CastI2F => write!(f, "CAST_I2F"),
            Instr::CastF2I => write!(f, "CAST_F2I"),
            Instr::CastI2D => write!(f, "CAST_I2D"),
            Instr::CastD2I => write!(f, "CAST_D2I"),
            Instr::CastF2D => write!(f, "CAST_F2D"),
            Instr::CastD2F => write!(f, "CAST_D2F"),
            Instr::ArrayLoad { .. } => write!(f, "ARRAY_LOAD"),
            Instr::ArrayStore { .. } => write!(f, "ARRAY_STORE"),
            Instr::AllocArray { .. } => write!(f, "ALLOC_ARRAY"),
        }
    }
}

impl IrFunction {
    /// Numbered instruction listing, one per line.
    pub fn dump(&self) -> String {
        let mut out = format!("=== {} ===\n", self.name);
        for (index, instr) in self.instrs.iter().enumerate() {
            out.push_str(&format!("{:3}: {}\n", index, instr));
        }
        out
    }
}
