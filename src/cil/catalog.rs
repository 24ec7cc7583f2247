use super::{opcodes, CatalogError, OpCode, OpCodeType};
use log::debug;
use once_cell::sync::Lazy;

/// First byte of every two-byte opcode.
pub const TWO_BYTE_PREFIX: u8 = 0xFE;

static STANDARD: Lazy<OpcodeCatalog> = Lazy::new(|| {
    OpcodeCatalog::new(opcodes::DEFINITIONS)
        .unwrap_or_else(|err| panic!("built-in opcode table is inconsistent: {err}"))
});

/// One-byte values must not collide with the prefix; two-byte values must carry it.
fn encodes_at_size(value: u16, size: u8) -> bool {
    match size {
        1 => value <= 0xFF && value != u16::from(TWO_BYTE_PREFIX),
        _ => value >> 8 == u16::from(TWO_BYTE_PREFIX),
    }
}

/// Lookup tables from encoded opcode bytes to opcode metadata.
pub struct OpcodeCatalog {
    one_byte: [Option<OpCode>; 256],
    two_byte: [Option<OpCode>; 256],
}

impl OpcodeCatalog {
    /// Builds a catalog from a definition set, skipping `Internal` pseudo-opcodes.
    pub fn new(definitions: &[OpCode]) -> Result<Self, CatalogError> {
        let mut catalog = Self {
            one_byte: [None; 256],
            two_byte: [None; 256],
        };

        for opcode in definitions {
            if opcode.opcode_type() == OpCodeType::Internal {
                continue;
            }

            let table = match opcode.size() {
                1 => &mut catalog.one_byte,
                2 => &mut catalog.two_byte,
                size => {
                    return Err(CatalogError::InvalidSize {
                        name: opcode.name(),
                        size,
                    })
                }
            };

            if !encodes_at_size(opcode.value(), opcode.size()) {
                return Err(CatalogError::InvalidEncoding {
                    name: opcode.name(),
                    value: opcode.value(),
                    size: opcode.size(),
                });
            }

            let slot = &mut table[usize::from(opcode.table_index())];
            if let Some(existing) = *slot {
                return Err(CatalogError::Collision {
                    existing: existing.name(),
                    incoming: opcode.name(),
                    value: opcode.value(),
                });
            }
            *slot = Some(*opcode);
        }

        debug!("built opcode catalog with {} entries", catalog.len());
        Ok(catalog)
    }

    /// The process-wide catalog for the full CIL opcode set, built on first use.
    pub fn standard() -> &'static OpcodeCatalog {
        &STANDARD
    }

    pub fn one_byte(&self, byte: u8) -> Option<OpCode> {
        self.one_byte[usize::from(byte)]
    }

    /// Looks up the opcode whose encoding is `0xFE byte`.
    pub fn two_byte(&self, byte: u8) -> Option<OpCode> {
        self.two_byte[usize::from(byte)]
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = OpCode> + '_ {
        self.one_byte
            .iter()
            .chain(self.two_byte.iter())
            .filter_map(|entry| *entry)
    }

    pub fn find(&self, name: &str) -> Option<OpCode> {
        self.iter().find(|opcode| opcode.name() == name)
    }
}
