use super::{
    opcodes, BranchTarget, ByteCursor, DecodeError, InstructionList, OpCode, OpcodeCatalog,
    Operand, OperandKind, Slot, TWO_BYTE_PREFIX,
};
use crate::metadata::{Argument, MethodBody, SymbolResolver, Token};
use log::{debug, trace};

/// Decodes one method body into an [`InstructionList`].
///
/// Decoding runs in two passes. The first walks the bytes linearly, resolving tokens and
/// slots and recording branch destinations as absolute offsets. The second swaps every
/// destination for a [`Label`](super::Label) of the instruction starting there, when one
/// does.
pub struct MethodBodyReader<'a, R: ?Sized> {
    body: &'a MethodBody,
    resolver: &'a R,
    catalog: &'a OpcodeCatalog,
}

impl<'a, R: SymbolResolver + ?Sized> MethodBodyReader<'a, R> {
    pub fn new(body: &'a MethodBody, resolver: &'a R) -> Self {
        Self {
            body,
            resolver,
            catalog: OpcodeCatalog::standard(),
        }
    }

    pub fn with_catalog(mut self, catalog: &'a OpcodeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn read_instructions(self) -> Result<InstructionList, DecodeError> {
        let il = self.body.il.as_slice();
        if u32::try_from(il.len()).is_err() {
            return Err(DecodeError::BodyTooLarge(il.len()));
        }

        let mut cursor = ByteCursor::new(il);
        let mut instructions = InstructionList::with_capacity((il.len() + 1) / 2);

        while !cursor.is_at_end() {
            // Fits: the body length was checked above.
            let offset = cursor.position() as u32;
            let opcode = self.read_opcode(&mut cursor, offset)?;
            let operand = self.read_operand(&mut cursor, opcode, offset)?;
            let instruction = instructions.push(offset, opcode, operand);
            trace!("{instruction}");
        }

        resolve_branches(&mut instructions);
        Ok(instructions)
    }

    fn read_opcode(&self, cursor: &mut ByteCursor<'_>, offset: u32) -> Result<OpCode, DecodeError> {
        let byte = cursor.read_u8()?;
        if byte != TWO_BYTE_PREFIX {
            return self
                .catalog
                .one_byte(byte)
                .ok_or(DecodeError::UnknownOpcode {
                    value: u16::from(byte),
                    offset,
                });
        }

        let second = cursor.read_u8()?;
        self.catalog
            .two_byte(second)
            .ok_or(DecodeError::UnknownOpcode {
                value: u16::from_be_bytes([TWO_BYTE_PREFIX, second]),
                offset,
            })
    }

    fn read_operand(
        &self,
        cursor: &mut ByteCursor<'_>,
        opcode: OpCode,
        offset: u32,
    ) -> Result<Operand, DecodeError> {
        let symbol = |source| DecodeError::Symbol { offset, source };

        let operand = match opcode.operand_kind() {
            OperandKind::InlineNone => Operand::None,
            OperandKind::ShortInlineI if opcode.value() == opcodes::LDC_I4_S.value() => {
                Operand::Int8(cursor.read_i8()?)
            }
            OperandKind::ShortInlineI => Operand::UInt8(cursor.read_u8()?),
            OperandKind::InlineI => Operand::Int32(cursor.read_i32()?),
            OperandKind::InlineI8 => Operand::Int64(cursor.read_i64()?),
            OperandKind::ShortInlineR => Operand::Float32(cursor.read_f32()?),
            OperandKind::InlineR => Operand::Float64(cursor.read_f64()?),
            OperandKind::ShortInlineBrTarget => {
                let delta = i64::from(cursor.read_i8()?);
                Operand::Branch(BranchTarget::Unresolved {
                    offset: cursor.position() as i64 + delta,
                })
            }
            OperandKind::InlineBrTarget => {
                let delta = i64::from(cursor.read_i32()?);
                Operand::Branch(BranchTarget::Unresolved {
                    offset: cursor.position() as i64 + delta,
                })
            }
            OperandKind::InlineSwitch => Operand::Switch(read_switch_table(cursor)?),
            OperandKind::InlineString => {
                let token = Token(cursor.read_u32()?);
                Operand::String(self.resolver.resolve_string(token).map_err(symbol)?)
            }
            OperandKind::InlineType
            | OperandKind::InlineMethod
            | OperandKind::InlineField
            | OperandKind::InlineTok => {
                let token = Token(cursor.read_u32()?);
                let context = self.body.generic_context.as_ref();
                Operand::Member(self.resolver.resolve_member(token, context).map_err(symbol)?)
            }
            OperandKind::InlineSig => {
                let token = Token(cursor.read_u32()?);
                Operand::Signature(self.resolver.resolve_signature(token).map_err(symbol)?)
            }
            OperandKind::ShortInlineLocal => self.local(u16::from(cursor.read_u8()?), offset)?,
            OperandKind::InlineLocal => self.local(cursor.read_u16()?, offset)?,
            OperandKind::ShortInlineArg => self.argument(u16::from(cursor.read_u8()?), offset)?,
            OperandKind::InlineArg => self.argument(cursor.read_u16()?, offset)?,
            kind @ OperandKind::InlinePhi => {
                return Err(DecodeError::UnsupportedOperand {
                    opcode: opcode.name(),
                    kind,
                    offset,
                })
            }
        };

        Ok(operand)
    }

    fn local(&self, index: u16, offset: u32) -> Result<Operand, DecodeError> {
        let locals = &self.body.locals;
        locals
            .get(usize::from(index))
            .cloned()
            .map(Operand::Local)
            .ok_or(DecodeError::SlotOutOfRange {
                slot: Slot::Local,
                index,
                count: locals.len(),
                offset,
            })
    }

    /// With a receiver, encoded index 0 is `this` and parameters start at 1.
    fn argument(&self, index: u16, offset: u32) -> Result<Operand, DecodeError> {
        let parameters = &self.body.parameters;
        let position = if self.body.has_this {
            match index.checked_sub(1) {
                Some(position) => position,
                None => return Ok(Operand::Argument(Argument::This)),
            }
        } else {
            index
        };

        parameters
            .get(usize::from(position))
            .cloned()
            .map(|parameter| Operand::Argument(Argument::Parameter(parameter)))
            .ok_or(DecodeError::SlotOutOfRange {
                slot: Slot::Argument,
                index,
                count: parameters.len() + usize::from(self.body.has_this),
                offset,
            })
    }
}

/// Reads `count` then `count` deltas, all relative to the end of the table.
fn read_switch_table(cursor: &mut ByteCursor<'_>) -> Result<Vec<BranchTarget>, DecodeError> {
    let count = cursor.read_u32()? as usize;
    let table_len = count.saturating_mul(4);
    cursor.ensure(table_len)?;

    let base = (cursor.position() + table_len) as i64;
    let mut targets = Vec::with_capacity(count);
    for _ in 0..count {
        let delta = i64::from(cursor.read_i32()?);
        targets.push(BranchTarget::Unresolved {
            offset: base + delta,
        });
    }
    Ok(targets)
}

fn resolve_branches(instructions: &mut InstructionList) {
    for index in 0..instructions.len() {
        let operand = match instructions.get_mut(index) {
            Some(instruction) if instruction.opcode().operand_kind().is_branch() => {
                std::mem::replace(instruction.operand_mut(), Operand::None)
            }
            _ => continue,
        };

        let resolved = match operand {
            Operand::Branch(target) => Operand::Branch(resolve_target(instructions, target)),
            Operand::Switch(mut targets) => {
                for target in &mut targets {
                    *target = resolve_target(instructions, *target);
                }
                Operand::Switch(targets)
            }
            other => other,
        };

        if let Some(instruction) = instructions.get_mut(index) {
            *instruction.operand_mut() = resolved;
        }
    }
}

fn resolve_target(instructions: &InstructionList, target: BranchTarget) -> BranchTarget {
    let BranchTarget::Unresolved { offset } = target else {
        return target;
    };
    match instructions.label_at(offset) {
        Some(label) => BranchTarget::Resolved(label),
        None => {
            debug!("branch target {offset} does not start an instruction");
            target
        }
    }
}
