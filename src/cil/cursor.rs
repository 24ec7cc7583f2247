use crate::cil::DecodeError;

/// Sequential little-endian reader over a method body.
///
/// Every read checks bounds first and either consumes exactly its width or fails
/// with [`DecodeError::OutOfRange`] leaving the position untouched.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Moves to an absolute position. This is the only way to reuse a cursor after a failed read.
    pub fn seek(&mut self, position: usize) -> Result<(), DecodeError> {
        if position > self.buffer.len() {
            return Err(DecodeError::OutOfRange {
                position,
                needed: 0,
                len: self.buffer.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Fails unless `needed` more bytes can be read.
    pub fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        match self.position.checked_add(needed) {
            Some(end) if end <= self.buffer.len() => Ok(()),
            _ => Err(DecodeError::OutOfRange {
                position: self.position,
                needed,
                len: self.buffer.len(),
            }),
        }
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(count)?;
        let bytes = &self.buffer[self.position..self.position + count];
        self.position += count;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.ensure(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buffer[self.position..self.position + N]);
        self.position += N;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.read_array::<1>().map(|[byte]| byte)
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        self.read_array().map(i8::from_le_bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        self.read_array().map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.read_array().map(i64::from_le_bytes)
    }

    // `from_le_bytes` reinterprets independently of host byte order.
    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_array().map(f32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.read_array().map(f64::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let bytes = [
            0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23,
            0x01,
        ];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_u8().unwrap(), 0x01);
        assert_eq!(cursor.read_i16().unwrap(), 0x1234);
        assert_eq!(cursor.read_i32().unwrap(), 0x12345678);
        assert_eq!(cursor.read_i64().unwrap(), 0x0123456789ABCDEF);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_reads_signed_values() {
        let bytes = [0xFF, 0xFE, 0xFF, 0xFD, 0xFF, 0xFF, 0xFF];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_i8().unwrap(), -1);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert_eq!(cursor.read_i32().unwrap(), -3);
    }

    #[test]
    fn test_reads_floats() {
        let mut bytes = Vec::new();
        bytes.extend(1.5f32.to_le_bytes());
        bytes.extend((-2.25f64).to_le_bytes());
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_f32().unwrap(), 1.5);
        assert_eq!(cursor.read_f64().unwrap(), -2.25);
    }

    #[test]
    fn test_failed_read_does_not_advance() {
        let bytes = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_u8().unwrap();

        let err = cursor.read_i32().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::OutOfRange {
                position: 1,
                needed: 4,
                len: 3
            }
        ));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_i16().unwrap(), 0x0302);
    }

    #[test]
    fn test_read_bytes() {
        let bytes = [1, 2, 3, 4];
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert!(cursor.read_bytes(2).is_err());
        assert_eq!(cursor.remaining(), 1);
        assert_eq!(cursor.read_bytes(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_seek_resets_after_failure() {
        let bytes = [0xAA, 0xBB];
        let mut cursor = ByteCursor::new(&bytes);
        assert!(cursor.read_i64().is_err());
        cursor.seek(1).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 0xBB);
        assert!(cursor.seek(3).is_err());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_ensure_guards_overflow() {
        let bytes = [0u8; 2];
        let cursor = ByteCursor::new(&bytes);
        assert!(cursor.ensure(usize::MAX).is_err());
        assert!(cursor.ensure(2).is_ok());
    }
}
