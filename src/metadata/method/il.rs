//! CIL instruction boundaries.
//!
//! Sequence points refer to instructions by their IL offset. Finding those offsets only requires
//! the encoded length of every instruction, which is fully determined by its opcode and, for
//! `switch`, by the case count that follows it.

use crate::{file::parser::Parser, Result};

/// Encoding of an instruction operand (ECMA-335 III.1.9)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    /// No operand
    None,
    /// 1 byte: short branch targets, `ldc.i4.s`, short argument and local indices
    Int8,
    /// 2 byte: long argument and local indices
    UInt16,
    /// 4 byte: `ldc.i4`, `ldc.r4`, long branch targets
    Int32,
    /// 8 byte: `ldc.i8`, `ldc.r8`
    Int64,
    /// 4 byte metadata token
    Token,
    /// `switch`: 4 byte case count, followed by that many 4 byte targets
    Switch,
}

/// Operand encoding of a single byte opcode, `None` for reserved opcodes.
#[must_use]
pub fn operand_type(opcode: u8) -> Option<OperandType> {
    let op_type = match opcode {
        0x24 | 0x77 | 0x78 | 0xA6..=0xB2 | 0xBB..=0xC1 | 0xC4 | 0xC5 | 0xC7..=0xCF | 0xE1..=0xFF => {
            return None;
        }
        0x0E..=0x13 | 0x1F | 0x2B..=0x37 | 0xDE => OperandType::Int8,
        0x20 | 0x22 | 0x38..=0x44 | 0xDD => OperandType::Int32,
        0x21 | 0x23 => OperandType::Int64,
        0x27..=0x29
        | 0x6F..=0x75
        | 0x79
        | 0x7B..=0x81
        | 0x8C
        | 0x8D
        | 0x8F
        | 0xA3..=0xA5
        | 0xC2
        | 0xC6
        | 0xD0 => OperandType::Token,
        0x45 => OperandType::Switch,
        _ => OperandType::None,
    };

    Some(op_type)
}

/// Operand encoding of an `0xFE` prefixed opcode, `None` for reserved opcodes.
#[must_use]
pub fn operand_type_fe(opcode: u8) -> Option<OperandType> {
    let op_type = match opcode {
        0x08 | 0x10 | 0x1B | 0x1F..=0xFF => return None,
        0x06 | 0x07 | 0x15 | 0x16 | 0x1C => OperandType::Token,
        0x09..=0x0E => OperandType::UInt16,
        0x12 | 0x19 => OperandType::Int8,
        _ => OperandType::None,
    };

    Some(op_type)
}

/// Skip the instruction at the current position of `parser`, returning its size in bytes.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for reserved opcodes, [`crate::Error::OutOfBounds`] if
/// the operand is truncated.
pub fn skip_instruction(parser: &mut Parser) -> Result<usize> {
    let start = parser.pos();
    let first_byte = parser.read_le::<u8>()?;

    let op_type = match first_byte {
        0xFE => {
            let second_byte = parser.read_le::<u8>()?;
            operand_type_fe(second_byte)
                .ok_or_else(|| malformed_error!("Invalid opcode: FE {:02X}", second_byte))?
        }
        _ => operand_type(first_byte)
            .ok_or_else(|| malformed_error!("Invalid opcode: {:02X}", first_byte))?,
    };

    match op_type {
        OperandType::None => {}
        OperandType::Int8 => parser.advance_by(1)?,
        OperandType::UInt16 => parser.advance_by(2)?,
        OperandType::Int32 | OperandType::Token => parser.advance_by(4)?,
        OperandType::Int64 => parser.advance_by(8)?,
        OperandType::Switch => {
            let case_count = parser.read_le::<u32>()? as usize;
            let targets = case_count
                .checked_mul(4)
                .ok_or(out_of_bounds_error!())?;
            parser.advance_by(targets)?;
        }
    }

    Ok(parser.pos() - start)
}

/// IL offsets of every instruction in `code`, in stream order.
///
/// # Errors
/// Returns an error if the stream contains a reserved opcode or ends inside an instruction.
pub fn instruction_offsets(code: &[u8]) -> Result<Vec<u32>> {
    let mut parser = Parser::new(code);
    let mut offsets = Vec::new();

    while parser.has_more_data() {
        let offset = u32::try_from(parser.pos())
            .map_err(|_| malformed_error!("IL stream too large - {}", code.len()))?;
        offsets.push(offset);
        skip_instruction(&mut parser)?;
    }

    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn offsets_mixed_stream() {
        #[rustfmt::skip]
        let code = [
            0x00,                               // 0: nop
            0x1F, 0x2A,                         // 1: ldc.i4.s 42
            0x20, 0x01, 0x00, 0x00, 0x00,       // 3: ldc.i4 1
            0x21, 0, 0, 0, 0, 0, 0, 0, 0,       // 8: ldc.i8 0
            0x28, 0x01, 0x00, 0x00, 0x0A,       // 17: call
            0xFE, 0x0C, 0x01, 0x00,             // 22: ldloc 1
            0xFE, 0x06, 0x02, 0x00, 0x00, 0x06, // 26: ldftn
            0x45, 0x02, 0x00, 0x00, 0x00,       // 32: switch (2 targets)
            0x00, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x2B, 0x00,                         // 45: br.s
            0xFE, 0x1A,                         // 47: rethrow
            0x2A,                               // 49: ret
        ];

        assert_eq!(
            instruction_offsets(&code).unwrap(),
            vec![0, 1, 3, 8, 17, 22, 26, 32, 45, 47, 49]
        );
    }

    #[test]
    fn empty_stream() {
        assert!(instruction_offsets(&[]).unwrap().is_empty());
    }

    #[test]
    fn reserved_opcodes() {
        assert!(matches!(instruction_offsets(&[0x24]), Err(Error::Malformed { .. })));
        assert!(matches!(
            instruction_offsets(&[0xFE, 0x08]),
            Err(Error::Malformed { .. })
        ));
        assert!(operand_type(0xE0).is_some());
        assert!(operand_type(0xE1).is_none());
        assert!(operand_type_fe(0x1E).is_some());
    }

    #[test]
    fn truncated_operand() {
        assert!(matches!(
            instruction_offsets(&[0x00, 0x28, 0x01]),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(instruction_offsets(&[0x45, 0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }
}
