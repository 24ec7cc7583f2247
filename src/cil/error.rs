use super::OperandKind;
use crate::metadata::ResolveError;
use std::fmt;

/// Which descriptor list a slot operand indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Local,
    Argument,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Local => f.write_str("local"),
            Slot::Argument => f.write_str("argument"),
        }
    }
}

/// Errors raised while disassembling one method body. All of them abort that body only.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("method `{0}` has no body")]
    NoBody(String),

    #[error("read of {needed} bytes at position {position} exceeds buffer of {len} bytes")]
    OutOfRange {
        position: usize,
        needed: usize,
        len: usize,
    },

    #[error("unknown opcode {value:#06x} at offset {offset}")]
    UnknownOpcode { value: u16, offset: u32 },

    #[error("unsupported operand kind {kind:?} for `{opcode}` at offset {offset}")]
    UnsupportedOperand {
        opcode: &'static str,
        kind: OperandKind,
        offset: u32,
    },

    #[error("symbol resolution failed at offset {offset}: {source}")]
    Symbol {
        offset: u32,
        #[source]
        source: ResolveError,
    },

    #[error("{slot} index {index} out of range ({count} declared) at offset {offset}")]
    SlotOutOfRange {
        slot: Slot,
        index: u16,
        count: usize,
        offset: u32,
    },

    #[error("method body of {0} bytes exceeds the addressable offset range")]
    BodyTooLarge(usize),
}

/// Raised when a definition set cannot be indexed into a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("opcodes `{existing}` and `{incoming}` both encode to {value:#06x}")]
    Collision {
        existing: &'static str,
        incoming: &'static str,
        value: u16,
    },
    #[error("opcode `{name}` has invalid encoded size {size}")]
    InvalidSize { name: &'static str, size: u8 },
    #[error("opcode `{name}` value {value:#06x} cannot be encoded in {size} byte(s)")]
    InvalidEncoding {
        name: &'static str,
        value: u16,
        size: u8,
    },
}
