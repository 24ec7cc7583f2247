use super::{OpCode, TWO_BYTE_PREFIX};
use crate::metadata::Token;

/// Writes IL bytes: opcodes followed by little-endian operands.
///
/// Nothing checks that operands match the opcode, so it can also produce malformed bodies.
#[derive(Debug, Clone, Default)]
pub struct IlEncoder {
    output: Vec<u8>,
}

impl IlEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.output.len()
    }

    /// Writes the opcode bytes. Assumes a catalog-valid encoding: size 2 means the
    /// value carries the `0xFE` prefix.
    pub fn op(&mut self, opcode: OpCode) -> &mut Self {
        if opcode.size() == 2 {
            self.output.push(TWO_BYTE_PREFIX);
        }
        self.output.push(opcode.table_index());
        self
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.output.push(value);
        self
    }

    pub fn i8(&mut self, value: i8) -> &mut Self {
        self.output.extend(value.to_le_bytes());
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.output.extend(value.to_le_bytes());
        self
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.output.extend(value.to_le_bytes());
        self
    }

    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.output.extend(value.to_le_bytes());
        self
    }

    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.output.extend(value.to_le_bytes());
        self
    }

    pub fn f64(&mut self, value: f64) -> &mut Self {
        self.output.extend(value.to_le_bytes());
        self
    }

    pub fn token(&mut self, token: Token) -> &mut Self {
        self.output.extend(token.0.to_le_bytes());
        self
    }

    /// Entry count followed by the deltas, each relative to the end of the table.
    pub fn switch_table(&mut self, deltas: &[i32]) -> &mut Self {
        self.output.extend((deltas.len() as u32).to_le_bytes());
        for delta in deltas {
            self.output.extend(delta.to_le_bytes());
        }
        self
    }

    /// Takes the bytes written so far, leaving the encoder empty.
    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cil::opcodes;

    #[test]
    fn test_encodes_one_and_two_byte_opcodes() {
        let bytes = IlEncoder::new()
            .op(opcodes::NOP)
            .op(opcodes::CEQ)
            .op(opcodes::RET)
            .finish();
        assert_eq!(bytes, vec![0x00, 0xFE, 0x01, 0x2A]);
    }

    #[test]
    fn test_encodes_operands_little_endian() {
        let bytes = IlEncoder::new()
            .op(opcodes::LDC_I4)
            .i32(0x0102_0304)
            .op(opcodes::LDSTR)
            .token(Token(0x7000_0001))
            .finish();
        assert_eq!(
            bytes,
            vec![0x20, 0x04, 0x03, 0x02, 0x01, 0x72, 0x01, 0x00, 0x00, 0x70]
        );
    }

    #[test]
    fn test_encodes_switch_table() {
        let bytes = IlEncoder::new().op(opcodes::SWITCH).switch_table(&[-1]).finish();
        assert_eq!(bytes, vec![0x45, 0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_finish_resets() {
        let mut encoder = IlEncoder::new();
        encoder.op(opcodes::NOP);
        assert_eq!(encoder.position(), 1);
        assert_eq!(encoder.finish(), vec![0x00]);
        assert_eq!(encoder.position(), 0);
    }
}
