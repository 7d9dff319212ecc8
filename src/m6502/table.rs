// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Instruction table for the base MOS 6502.
//!
//! Entries for one mnemonic are ordered with zero-page modes before their
//! absolute counterparts; the index in [`crate::m6502::instruction_set`]
//! relies on that order for the operand-magnitude selection between the two.

use crate::m6502::AddressMode;

/// One row of the instruction catalog.
#[derive(Debug, Clone, Copy)]
pub struct InstructionEntry {
    pub mnemonic: &'static str,
    pub mode: AddressMode,
    pub opcode: u8,
}

const fn base(mnemonic: &'static str, mode: AddressMode, opcode: u8) -> InstructionEntry {
    InstructionEntry {
        mnemonic,
        mode,
        opcode,
    }
}

use AddressMode::*;

/// All base 6502 instructions.
pub static MAIN_INSTRUCTION_TABLE: &[InstructionEntry] = &[
    // ADC - Add with Carry
    base("adc", Immediate, 0x69),
    base("adc", ZeroPage, 0x65),
    base("adc", ZeroPageX, 0x75),
    base("adc", ZeroPageXIndirect, 0x61),
    base("adc", ZeroPageIndirectY, 0x71),
    base("adc", Absolute, 0x6d),
    base("adc", AbsoluteX, 0x7d),
    base("adc", AbsoluteY, 0x79),
    // AND - Logical AND
    base("and", Immediate, 0x29),
    base("and", ZeroPage, 0x25),
    base("and", ZeroPageX, 0x35),
    base("and", ZeroPageXIndirect, 0x21),
    base("and", ZeroPageIndirectY, 0x31),
    base("and", Absolute, 0x2d),
    base("and", AbsoluteX, 0x3d),
    base("and", AbsoluteY, 0x39),
    // ASL - Arithmetic Shift Left
    base("asl", Accumulator, 0x0a),
    base("asl", ZeroPage, 0x06),
    base("asl", ZeroPageX, 0x16),
    base("asl", Absolute, 0x0e),
    base("asl", AbsoluteX, 0x1e),
    // Branches
    base("bcc", Relative, 0x90),
    base("bcs", Relative, 0xb0),
    base("beq", Relative, 0xf0),
    // BIT - Bit Test
    base("bit", ZeroPage, 0x24),
    base("bit", Absolute, 0x2c),
    base("bmi", Relative, 0x30),
    base("bne", Relative, 0xd0),
    base("bpl", Relative, 0x10),
    // BRK - Break
    base("brk", Implied, 0x00),
    base("bvc", Relative, 0x50),
    base("bvs", Relative, 0x70),
    // Flag operations
    base("clc", Implied, 0x18),
    base("cld", Implied, 0xd8),
    base("cli", Implied, 0x58),
    base("clv", Implied, 0xb8),
    // CMP - Compare Accumulator
    base("cmp", Immediate, 0xc9),
    base("cmp", ZeroPage, 0xc5),
    base("cmp", ZeroPageX, 0xd5),
    base("cmp", ZeroPageXIndirect, 0xc1),
    base("cmp", ZeroPageIndirectY, 0xd1),
    base("cmp", Absolute, 0xcd),
    base("cmp", AbsoluteX, 0xdd),
    base("cmp", AbsoluteY, 0xd9),
    // CPX / CPY - Compare Index Registers
    base("cpx", Immediate, 0xe0),
    base("cpx", ZeroPage, 0xe4),
    base("cpx", Absolute, 0xec),
    base("cpy", Immediate, 0xc0),
    base("cpy", ZeroPage, 0xc4),
    base("cpy", Absolute, 0xcc),
    // DEC - Decrement Memory
    base("dec", ZeroPage, 0xc6),
    base("dec", ZeroPageX, 0xd6),
    base("dec", Absolute, 0xce),
    base("dec", AbsoluteX, 0xde),
    base("dex", Implied, 0xca),
    base("dey", Implied, 0x88),
    // EOR - Exclusive OR
    base("eor", Immediate, 0x49),
    base("eor", ZeroPage, 0x45),
    base("eor", ZeroPageX, 0x55),
    base("eor", ZeroPageXIndirect, 0x41),
    base("eor", ZeroPageIndirectY, 0x51),
    base("eor", Absolute, 0x4d),
    base("eor", AbsoluteX, 0x5d),
    base("eor", AbsoluteY, 0x59),
    // INC - Increment Memory
    base("inc", ZeroPage, 0xe6),
    base("inc", ZeroPageX, 0xf6),
    base("inc", Absolute, 0xee),
    base("inc", AbsoluteX, 0xfe),
    base("inx", Implied, 0xe8),
    base("iny", Implied, 0xc8),
    // JMP / JSR
    base("jmp", Absolute, 0x4c),
    base("jmp", AbsoluteIndirect, 0x6c),
    base("jsr", Absolute, 0x20),
    // LDA - Load Accumulator
    base("lda", Immediate, 0xa9),
    base("lda", ZeroPage, 0xa5),
    base("lda", ZeroPageX, 0xb5),
    base("lda", ZeroPageXIndirect, 0xa1),
    base("lda", ZeroPageIndirectY, 0xb1),
    base("lda", Absolute, 0xad),
    base("lda", AbsoluteX, 0xbd),
    base("lda", AbsoluteY, 0xb9),
    // LDX - Load X Register
    base("ldx", Immediate, 0xa2),
    base("ldx", ZeroPage, 0xa6),
    base("ldx", ZeroPageY, 0xb6),
    base("ldx", Absolute, 0xae),
    base("ldx", AbsoluteY, 0xbe),
    // LDY - Load Y Register
    base("ldy", Immediate, 0xa0),
    base("ldy", ZeroPage, 0xa4),
    base("ldy", ZeroPageX, 0xb4),
    base("ldy", Absolute, 0xac),
    base("ldy", AbsoluteX, 0xbc),
    // LSR - Logical Shift Right
    base("lsr", Accumulator, 0x4a),
    base("lsr", ZeroPage, 0x46),
    base("lsr", ZeroPageX, 0x56),
    base("lsr", Absolute, 0x4e),
    base("lsr", AbsoluteX, 0x5e),
    base("nop", Implied, 0xea),
    // ORA - Logical OR
    base("ora", Immediate, 0x09),
    base("ora", ZeroPage, 0x05),
    base("ora", ZeroPageX, 0x15),
    base("ora", ZeroPageXIndirect, 0x01),
    base("ora", ZeroPageIndirectY, 0x11),
    base("ora", Absolute, 0x0d),
    base("ora", AbsoluteX, 0x1d),
    base("ora", AbsoluteY, 0x19),
    // Stack operations
    base("pha", Implied, 0x48),
    base("php", Implied, 0x08),
    base("pla", Implied, 0x68),
    base("plp", Implied, 0x28),
    // ROL / ROR - Rotates
    base("rol", Accumulator, 0x2a),
    base("rol", ZeroPage, 0x26),
    base("rol", ZeroPageX, 0x36),
    base("rol", Absolute, 0x2e),
    base("rol", AbsoluteX, 0x3e),
    base("ror", Accumulator, 0x6a),
    base("ror", ZeroPage, 0x66),
    base("ror", ZeroPageX, 0x76),
    base("ror", Absolute, 0x6e),
    base("ror", AbsoluteX, 0x7e),
    base("rti", Implied, 0x40),
    base("rts", Implied, 0x60),
    // SBC - Subtract with Carry
    base("sbc", Immediate, 0xe9),
    base("sbc", ZeroPage, 0xe5),
    base("sbc", ZeroPageX, 0xf5),
    base("sbc", ZeroPageXIndirect, 0xe1),
    base("sbc", ZeroPageIndirectY, 0xf1),
    base("sbc", Absolute, 0xed),
    base("sbc", AbsoluteX, 0xfd),
    base("sbc", AbsoluteY, 0xf9),
    base("sec", Implied, 0x38),
    base("sed", Implied, 0xf8),
    base("sei", Implied, 0x78),
    // STA - Store Accumulator
    base("sta", ZeroPage, 0x85),
    base("sta", ZeroPageX, 0x95),
    base("sta", ZeroPageXIndirect, 0x81),
    base("sta", ZeroPageIndirectY, 0x91),
    base("sta", Absolute, 0x8d),
    base("sta", AbsoluteX, 0x9d),
    base("sta", AbsoluteY, 0x99),
    // STX / STY - Store Index Registers
    base("stx", ZeroPage, 0x86),
    base("stx", ZeroPageY, 0x96),
    base("stx", Absolute, 0x8e),
    base("sty", ZeroPage, 0x84),
    base("sty", ZeroPageX, 0x94),
    base("sty", Absolute, 0x8c),
    // Register transfers
    base("tax", Implied, 0xaa),
    base("tay", Implied, 0xa8),
    base("tsx", Implied, 0xba),
    base("txa", Implied, 0x8a),
    base("txs", Implied, 0x9a),
    base("tya", Implied, 0x98),
];
