use std::fmt;

mod catalog;
mod cursor;
mod decoder;
mod encoder;
mod error;
mod instruction;
pub mod opcodes;

pub use catalog::{OpcodeCatalog, TWO_BYTE_PREFIX};
pub use cursor::ByteCursor;
pub use decoder::MethodBodyReader;
pub use encoder::IlEncoder;
pub use error::{CatalogError, DecodeError, Slot};
pub use instruction::{BranchTarget, Instruction, InstructionList, Label, Operand};

/// How the bytes following an opcode are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    InlineNone,
    ShortInlineI,
    InlineI,
    InlineI8,
    ShortInlineR,
    InlineR,
    ShortInlineBrTarget,
    InlineBrTarget,
    InlineSwitch,
    InlineString,
    InlineType,
    InlineMethod,
    InlineField,
    InlineTok,
    InlineSig,
    ShortInlineLocal,
    InlineLocal,
    ShortInlineArg,
    InlineArg,
    // Reserved by ECMA-335, never emitted by compilers.
    InlinePhi,
}

impl OperandKind {
    /// Bytes taken by the operand, or `None` when it depends on the operand itself (`switch`).
    pub const fn fixed_size(self) -> Option<u32> {
        match self {
            OperandKind::InlineNone | OperandKind::InlinePhi => Some(0),
            OperandKind::ShortInlineI
            | OperandKind::ShortInlineBrTarget
            | OperandKind::ShortInlineLocal
            | OperandKind::ShortInlineArg => Some(1),
            OperandKind::InlineLocal | OperandKind::InlineArg => Some(2),
            OperandKind::InlineI
            | OperandKind::ShortInlineR
            | OperandKind::InlineBrTarget
            | OperandKind::InlineString
            | OperandKind::InlineType
            | OperandKind::InlineMethod
            | OperandKind::InlineField
            | OperandKind::InlineTok
            | OperandKind::InlineSig => Some(4),
            OperandKind::InlineI8 | OperandKind::InlineR => Some(8),
            OperandKind::InlineSwitch => None,
        }
    }

    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            OperandKind::ShortInlineBrTarget | OperandKind::InlineBrTarget | OperandKind::InlineSwitch
        )
    }
}

/// Opcode classes as ECMA-335 groups them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCodeType {
    Primitive,
    Macro,
    Prefix,
    ObjModel,
    Annotation,
    /// Encoding artifacts such as `prefix1`; never decoded as instructions.
    Internal,
}

/// Immutable metadata for one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpCode {
    name: &'static str,
    value: u16,
    size: u8,
    operand_kind: OperandKind,
    opcode_type: OpCodeType,
}

impl OpCode {
    pub const fn new(
        name: &'static str,
        value: u16,
        size: u8,
        operand_kind: OperandKind,
        opcode_type: OpCodeType,
    ) -> Self {
        Self {
            name,
            value,
            size,
            operand_kind,
            opcode_type,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn value(&self) -> u16 {
        self.value
    }

    /// Encoded size of the opcode itself, 1 or 2 bytes.
    pub const fn size(&self) -> u8 {
        self.size
    }

    pub const fn operand_kind(&self) -> OperandKind {
        self.operand_kind
    }

    pub const fn opcode_type(&self) -> OpCodeType {
        self.opcode_type
    }

    /// The byte that indexes this opcode in its catalog table.
    pub const fn table_index(&self) -> u8 {
        (self.value & 0xFF) as u8
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
