use super::{OpCode, OperandKind};
use crate::metadata::{Argument, LocalVariable, Member, Signature};
use std::fmt;
use std::ops::Index;

/// Position of an instruction inside its [`InstructionList`], named by its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
    index: usize,
    offset: u32,
}

impl Label {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IL_{:04x}", self.offset)
    }
}

/// Where a branch or switch entry goes.
///
/// `Unresolved` keeps the absolute byte offset when it does not start any decoded
/// instruction, e.g. it lands mid-instruction or past the end of the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchTarget {
    Resolved(Label),
    Unresolved { offset: i64 },
}

impl BranchTarget {
    pub fn label(&self) -> Option<Label> {
        match self {
            BranchTarget::Resolved(label) => Some(*label),
            BranchTarget::Unresolved { .. } => None,
        }
    }

    /// Absolute byte offset of the target.
    pub fn offset(&self) -> i64 {
        match self {
            BranchTarget::Resolved(label) => i64::from(label.offset),
            BranchTarget::Unresolved { offset } => *offset,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, BranchTarget::Resolved(_))
    }
}

impl fmt::Display for BranchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchTarget::Resolved(label) => write!(f, "{label}"),
            BranchTarget::Unresolved { offset } if *offset >= 0 => {
                write!(f, "<unresolved IL_{offset:04x}>")
            }
            BranchTarget::Unresolved { offset } => write!(f, "<unresolved {offset}>"),
        }
    }
}

/// Decoded operand. The live variant follows the opcode's [`OperandKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    None,
    Int8(i8),
    UInt8(u8),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Branch(BranchTarget),
    Switch(Vec<BranchTarget>),
    String(String),
    Member(Member),
    Signature(Signature),
    Local(LocalVariable),
    Argument(Argument),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => Ok(()),
            Operand::Int8(value) => write!(f, "{value}"),
            Operand::UInt8(value) => write!(f, "{value}"),
            Operand::Int32(value) => write!(f, "{value}"),
            Operand::Int64(value) => write!(f, "{value}"),
            Operand::Float32(value) => write!(f, "{value}"),
            Operand::Float64(value) => write!(f, "{value}"),
            Operand::Branch(target) => write!(f, "{target}"),
            Operand::Switch(targets) => {
                for (i, target) in targets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{target}")?;
                }
                Ok(())
            }
            Operand::String(value) => write!(f, "\"{value}\""),
            Operand::Member(member) => write!(f, "{member}"),
            Operand::Signature(signature) => write!(f, "{signature}"),
            Operand::Local(local) => write!(f, "{local}"),
            Operand::Argument(argument) => write!(f, "{argument}"),
        }
    }
}

/// One decoded instruction. `previous` and `next` are indices into the owning list.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    index: usize,
    offset: u32,
    opcode: OpCode,
    operand: Operand,
    previous: Option<usize>,
    next: Option<usize>,
}

impl Instruction {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset where the instruction starts.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }

    pub fn label(&self) -> Label {
        Label {
            index: self.index,
            offset: self.offset,
        }
    }

    /// Encoded size in bytes, opcode included.
    pub fn size(&self) -> u32 {
        let operand_size = match (self.opcode.operand_kind(), &self.operand) {
            (OperandKind::InlineSwitch, Operand::Switch(targets)) => {
                4 * (1 + targets.len() as u32)
            }
            (kind, _) => kind.fixed_size().unwrap_or(4),
        };
        u32::from(self.opcode.size()) + operand_size
    }

    pub(crate) fn operand_mut(&mut self) -> &mut Operand {
        &mut self.operand
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.opcode.name())?;
        if self.operand != Operand::None {
            write!(f, " {}", self.operand)?;
        }
        Ok(())
    }
}

/// The decoded body: instructions in offset order, and the only owner of each one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionList {
    instructions: Vec<Instruction>,
}

impl InstructionList {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            instructions: Vec::with_capacity(capacity),
        }
    }

    /// Appends an instruction, linking it after the current last one.
    pub(crate) fn push(&mut self, offset: u32, opcode: OpCode, operand: Operand) -> &Instruction {
        let index = self.instructions.len();
        let previous = index.checked_sub(1);
        if let Some(last) = self.instructions.last_mut() {
            last.next = Some(index);
        }
        self.instructions.push(Instruction {
            index,
            offset,
            opcode,
            operand,
            previous,
            next: None,
        });
        &self.instructions[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.instructions.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn first(&self) -> Option<&Instruction> {
        self.instructions.first()
    }

    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    pub fn previous(&self, instruction: &Instruction) -> Option<&Instruction> {
        instruction.previous.and_then(|index| self.get(index))
    }

    pub fn next(&self, instruction: &Instruction) -> Option<&Instruction> {
        instruction.next.and_then(|index| self.get(index))
    }

    /// Finds the instruction starting exactly at `offset`.
    pub fn at_offset(&self, offset: u32) -> Option<&Instruction> {
        self.instructions
            .binary_search_by_key(&offset, |instruction| instruction.offset)
            .ok()
            .map(|index| &self.instructions[index])
    }

    /// Label of the instruction starting exactly at an absolute offset, if any.
    pub fn label_at(&self, offset: i64) -> Option<Label> {
        let offset = u32::try_from(offset).ok()?;
        self.at_offset(offset).map(Instruction::label)
    }

    pub fn target(&self, target: &BranchTarget) -> Option<&Instruction> {
        target.label().and_then(|label| self.get(label.index))
    }

    /// Sum of all encoded sizes, equal to the length of the decoded body.
    pub fn byte_len(&self) -> u64 {
        self.instructions
            .iter()
            .map(|instruction| u64::from(instruction.size()))
            .sum()
    }

    pub fn into_vec(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl Index<usize> for InstructionList {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Instruction {
        &self.instructions[index]
    }
}

impl<'a> IntoIterator for &'a InstructionList {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl fmt::Display for InstructionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cil::opcodes;
    use crate::metadata::{MemberKind, Parameter};

    fn list() -> InstructionList {
        let mut list = InstructionList::default();
        list.push(0, opcodes::LDC_I4_S, Operand::Int8(-3));
        list.push(2, opcodes::BR_S, Operand::Branch(BranchTarget::Unresolved { offset: 0 }));
        list.push(4, opcodes::RET, Operand::None);
        list
    }

    #[test]
    fn test_push_links_neighbours() {
        let list = list();
        let first = list.first().unwrap();
        assert_eq!(first.previous(), None);
        assert_eq!(first.next(), Some(1));

        let middle = &list[1];
        assert_eq!(list.previous(middle).unwrap().offset(), 0);
        assert_eq!(list.next(middle).unwrap().offset(), 4);
        assert_eq!(list.last().unwrap().next(), None);
    }

    #[test]
    fn test_sizes_follow_operand_kind() {
        let list = list();
        let sizes: Vec<u32> = list.iter().map(Instruction::size).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(list.byte_len(), 5);

        let mut switch = InstructionList::default();
        let targets = vec![BranchTarget::Unresolved { offset: 0 }; 3];
        switch.push(0, opcodes::SWITCH, Operand::Switch(targets));
        switch.push(17, opcodes::CEQ, Operand::None);
        switch.push(19, opcodes::LDC_R8, Operand::Float64(0.5));
        switch.push(28, opcodes::LDARG, Operand::Argument(Argument::This));
        let sizes: Vec<u32> = switch.iter().map(Instruction::size).collect();
        assert_eq!(sizes, vec![17, 2, 9, 4]);
    }

    #[test]
    fn test_offset_lookup() {
        let list = list();
        assert_eq!(list.at_offset(2).unwrap().opcode(), opcodes::BR_S);
        assert!(list.at_offset(3).is_none());
        assert_eq!(list.label_at(4).unwrap().index(), 2);
        assert!(list.label_at(-1).is_none());
        assert!(list.label_at(i64::from(u32::MAX) + 1).is_none());
    }

    #[test]
    fn test_rendering() {
        let list = list();
        assert_eq!(list[0].to_string(), "IL_0000: ldc.i4.s -3");
        assert_eq!(list[2].to_string(), "IL_0004: ret");

        let mut rendered = InstructionList::default();
        let target = BranchTarget::Resolved(list[2].label());
        rendered.push(0x1a, opcodes::BR, Operand::Branch(target));
        rendered.push(
            0x1f,
            opcodes::SWITCH,
            Operand::Switch(vec![target, BranchTarget::Unresolved { offset: 0x30 }]),
        );
        rendered.push(0x2b, opcodes::LDSTR, Operand::String("hi".to_string()));
        rendered.push(
            0x30,
            opcodes::CALL,
            Operand::Member(Member::new(MemberKind::Method, "Foo::Bar")),
        );
        rendered.push(
            0x35,
            opcodes::LDARG_S,
            Operand::Argument(Argument::Parameter(Parameter::new(0, "x", "System.Int32"))),
        );
        rendered.push(0x37, opcodes::BR_S, Operand::Branch(BranchTarget::Unresolved { offset: -2 }));

        assert_eq!(
            rendered.to_string(),
            "IL_001a: br IL_0004\n\
             IL_001f: switch IL_0004,<unresolved IL_0030>\n\
             IL_002b: ldstr \"hi\"\n\
             IL_0030: call Foo::Bar\n\
             IL_0035: ldarg.s System.Int32 x\n\
             IL_0037: br.s <unresolved -2>\n"
        );
    }

    #[test]
    fn test_target_lookup() {
        let list = list();
        let resolved = BranchTarget::Resolved(list[2].label());
        assert_eq!(list.target(&resolved).unwrap().offset(), 4);
        assert_eq!(resolved.offset(), 4);
        assert!(list.target(&BranchTarget::Unresolved { offset: 4 }).is_none());
    }
}
