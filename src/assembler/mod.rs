// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Two-pass assembler driver.
//!
//! Pass 1 discovers symbol definitions and sizes every line; pass 2 emits
//! object bytes and the listing. Both passes process the same per-line
//! cycle: snapshot the location counter, parse, assemble, then advance the
//! counter by the number of bytes the line produced. The line must produce
//! the same number of bytes in both passes; forward references are sized as
//! absolute in pass 1 to keep downstream addresses stable, and a reference
//! that nevertheless changes a label's address is caught as a symbol
//! redefinition in pass 2.

pub mod cli;
pub mod error;
pub mod listing;
pub mod object;
pub mod pseudo_op;


use std::fs::{self, File};
use std::io::{self, Write};

use crate::core::ast::{EvalContext, EvalError, Expr, Statement};
use crate::core::grammar;
use crate::core::parser::{ParseError, Parser};
use crate::core::symbol_table::SymbolTable;
use crate::core::text_utils::untabify;
use crate::core::value::{Value, ValueError};
use crate::m6502::table::InstructionEntry;
use crate::m6502::{AddressMode, InstructionSet};

use cli::{listing_path, object_path, parse_args};
use error::{
    AsmError, AsmErrorKind, AsmRunError, AsmRunReport, Diagnostic, PassCounts, Severity,
};
use listing::{ListingLine, ListingWriter};
use object::ObjectWriter;
use pseudo_op::{PseudoOp, PseudoOpInfo};

pub use cli::VERSION;
pub use error::{AsmRunError as RunError, AsmRunReport as RunReport};

/// Pass-1 stand-in for an unresolved operand. It is deliberately above the
/// zero-page boundary so the instruction is sized with a two-byte operand.
const UNRESOLVED_OPERAND: u16 = 0x0100;

/// Run the assembler with command-line arguments.
pub fn run() -> Result<AsmRunReport, AsmRunError> {
    let cli = parse_args();
    run_one(&cli.source)
}

fn run_one(source_name: &str) -> Result<AsmRunReport, AsmRunError> {
    let contents = fs::read_to_string(source_name).map_err(|_| {
        AsmRunError::new(
            AsmError::new(AsmErrorKind::Io, "can't open source file", Some(source_name)),
            Vec::new(),
            Vec::new(),
        )
    })?;
    let lines: Vec<String> = contents.lines().map(untabify).collect();

    let mut assembler = Assembler::new();

    println!("starting pass 1");
    let pass1 = assembler.pass1(&lines);
    eprintln!(
        "Pass 1: detected {} errors, {} warnings",
        pass1.errors, pass1.warnings
    );

    let object_name = object_path(source_name);
    let listing_name = listing_path(source_name);
    let object_file = File::create(&object_name).map_err(|_| {
        AsmRunError::new(
            AsmError::new(AsmErrorKind::Io, "can't open object file", Some(&object_name)),
            assembler.take_diagnostics(),
            lines.clone(),
        )
    })?;
    let listing_file = File::create(&listing_name).map_err(|_| {
        AsmRunError::new(
            AsmError::new(
                AsmErrorKind::Io,
                "can't open listing file",
                Some(&listing_name),
            ),
            assembler.take_diagnostics(),
            lines.clone(),
        )
    })?;
    let mut object = ObjectWriter::new(object_file);
    let mut listing = ListingWriter::new(listing_file);

    println!("starting pass 2");
    let pass2 = assembler
        .pass2(&lines, &mut listing, &mut object)
        .map_err(|err| {
            AsmRunError::new(
                AsmError::new(AsmErrorKind::Io, &err.to_string(), None),
                assembler.take_diagnostics(),
                lines.clone(),
            )
        })?;
    eprintln!(
        "Pass 2: detected {} errors, {} warnings",
        pass2.errors, pass2.warnings
    );

    if pass1.errors > 0 || pass2.errors > 0 {
        return Err(AsmRunError::new(
            AsmError::new(AsmErrorKind::Assembler, "errors detected in source", None),
            assembler.take_diagnostics(),
            lines,
        ));
    }
    Ok(AsmRunReport::new(assembler.take_diagnostics(), lines))
}

/// Bytes produced by one source line, with their address.
struct LineOutput {
    addr: u16,
    bytes: Vec<u8>,
    word_start: Vec<bool>,
    show_address: bool,
}

impl LineOutput {
    fn new(addr: u16) -> Self {
        Self {
            addr,
            bytes: Vec::new(),
            word_start: Vec::new(),
            show_address: false,
        }
    }

    fn emit_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
        self.word_start.push(false);
    }

    fn emit_word(&mut self, word: u16) {
        self.bytes.push((word & 0xff) as u8);
        self.word_start.push(true);
        self.bytes.push((word >> 8) as u8);
        self.word_start.push(false);
    }
}

enum LineError {
    Parse(ParseError),
    Asm(AsmError),
}

/// Core assembler state.
pub struct Assembler {
    instructions: InstructionSet,
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    location_counter: u16,
    line_number: u32,
    pass_number: u8,
    end_reached: bool,
}

impl Assembler {
    #[must_use]
    pub fn new() -> Self {
        grammar::check_grammar();
        Self {
            instructions: InstructionSet::new(),
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
            location_counter: 0,
            line_number: 0,
            pass_number: 0,
            end_reached: false,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn begin_pass(&mut self, pass_number: u8) {
        self.pass_number = pass_number;
        self.end_reached = false;
        self.line_number = 0;
        self.location_counter = 0;
        self.symbols.set_lookup_undefined_ok(pass_number == 1);
    }

    pub fn pass1(&mut self, lines: &[String]) -> PassCounts {
        self.begin_pass(1);
        let mut counts = PassCounts::new();
        for source in lines {
            if self.end_reached {
                break;
            }
            self.line_number += 1;
            let out = match self.assemble_line(source) {
                Ok(out) => out,
                Err(err) => {
                    self.diagnose(err, &mut counts);
                    LineOutput::new(self.location_counter)
                }
            };
            self.location_counter = self.location_counter.wrapping_add(out.bytes.len() as u16);
        }
        counts.lines = self.line_number;
        counts
    }

    pub fn pass2<L: Write, O: Write>(
        &mut self,
        lines: &[String],
        listing: &mut ListingWriter<L>,
        object: &mut ObjectWriter<O>,
    ) -> io::Result<PassCounts> {
        self.begin_pass(2);
        let mut counts = PassCounts::new();
        for source in lines {
            if self.end_reached {
                break;
            }
            self.line_number += 1;
            let out = match self.assemble_line(source) {
                Ok(out) => out,
                Err(err) => {
                    self.diagnose(err, &mut counts);
                    LineOutput::new(self.location_counter)
                }
            };
            listing.write_line(&ListingLine {
                line_num: self.line_number,
                addr: out.addr,
                show_address: out.show_address,
                bytes: &out.bytes,
                word_start: &out.word_start,
                source,
            })?;
            object.write(out.addr, &out.bytes)?;
            self.location_counter = self.location_counter.wrapping_add(out.bytes.len() as u16);
        }
        counts.lines = self.line_number;
        Ok(counts)
    }

    fn diagnose(&mut self, err: LineError, counts: &mut PassCounts) {
        let (column, error) = match err {
            LineError::Parse(parse) => (
                Some(parse.column),
                AsmError::new(AsmErrorKind::Parser, &parse.message, None),
            ),
            LineError::Asm(error) => (None, error),
        };
        self.diagnostics
            .push(Diagnostic::new(self.line_number, Severity::Error, error).with_column(column));
        counts.errors += 1;
    }

    fn assemble_line(&mut self, source: &str) -> Result<LineOutput, LineError> {
        let statement = Parser::new(&self.instructions)
            .parse(self.line_number, self.location_counter, source)
            .map_err(LineError::Parse)?;

        let mut out = LineOutput::new(self.location_counter);
        let mnemonic = statement.mnemonic.as_deref().unwrap_or("");
        if mnemonic.is_empty() || self.instructions.valid_mnemonic(mnemonic) {
            self.assemble_instruction(&statement, &mut out)
                .map_err(LineError::Asm)?;
        } else if let Some(info) = pseudo_op::lookup(mnemonic) {
            self.assemble_pseudo_op(&statement, info, &mut out)
                .map_err(LineError::Asm)?;
        } else {
            return Err(LineError::Asm(AsmError::new(
                AsmErrorKind::Assembler,
                "unrecognized mnemonic",
                Some(mnemonic),
            )));
        }
        Ok(out)
    }

    fn assemble_instruction(
        &mut self,
        statement: &Statement,
        out: &mut LineOutput,
    ) -> Result<(), AsmError> {
        if let Some(label) = &statement.label {
            self.define_symbol(label, Value::known(self.location_counter))?;
        }
        let Some(mnemonic) = statement.mnemonic.as_deref() else {
            return Ok(());
        };

        // At most two entries: the zero-page/absolute pair.
        let entries: Vec<InstructionEntry> = self
            .instructions
            .get(mnemonic)
            .ok_or_else(|| {
                AsmError::new(AsmErrorKind::Instruction, "unrecognized mnemonic", Some(mnemonic))
            })?
            .to_vec();

        let expect_operand = match entries.len() {
            1 => entries[0].mode.operand_size() > 0,
            2 => true,
            n => panic!("internal error: instruction with {n} modes"),
        };
        if statement.operands.len() != usize::from(expect_operand) {
            return Err(AsmError::new(
                AsmErrorKind::Instruction,
                &format!(
                    "\"{}\" instruction requires {} operands, but {} provided",
                    mnemonic,
                    usize::from(expect_operand),
                    statement.operands.len()
                ),
                None,
            ));
        }

        if !expect_operand {
            out.emit_byte(entries[0].opcode);
            return Ok(());
        }

        let operand_value = self.convert_operand_uint16(&statement.operands[0])?;
        let mut selected = None;
        let mut operand_size = if operand_value > 0x00ff { 2 } else { 1 };
        let mut emitted_value = operand_value;
        for entry in &entries {
            if entry.mode == AddressMode::Relative {
                let displacement =
                    i32::from(operand_value) - (i32::from(self.location_counter) + 2);
                if self.pass_number == 2 && !(-128..=127).contains(&displacement) {
                    return Err(AsmError::new(
                        AsmErrorKind::Instruction,
                        &format!("relative branch displacement {displacement} out of range"),
                        None,
                    ));
                }
                selected = Some(entry.opcode);
                operand_size = 1;
                emitted_value = (displacement & 0xff) as u16;
                break;
            } else if entries.len() == 1 || entry.mode.operand_size() >= operand_size {
                selected = Some(entry.opcode);
                operand_size = entry.mode.operand_size();
                break;
            }
        }
        let Some(opcode) = selected else {
            return Err(AsmError::new(
                AsmErrorKind::Instruction,
                &format!(
                    "no \"{mnemonic}\" instruction with {operand_size} byte operand for value 0x{operand_value:04x}"
                ),
                None,
            ));
        };

        out.emit_byte(opcode);
        match operand_size {
            1 => out.emit_byte((emitted_value & 0xff) as u8),
            2 => out.emit_word(emitted_value),
            _ => {}
        }
        Ok(())
    }

    fn assemble_pseudo_op(
        &mut self,
        statement: &Statement,
        info: &PseudoOpInfo,
        out: &mut LineOutput,
    ) -> Result<(), AsmError> {
        if let Some(label) = &statement.label {
            if info.label_disallowed {
                return Err(AsmError::new(
                    AsmErrorKind::Directive,
                    &format!("pseudo-op {} not allowed to have label", info.mnemonic),
                    None,
                ));
            }
            if !info.label_isnt_loc {
                self.define_symbol(label, Value::known(self.location_counter))?;
            }
        }

        match info.op {
            PseudoOp::Ascii => {
                let Some(Expr::StringConstant(text)) = statement.operands.first() else {
                    return Err(AsmError::new(
                        AsmErrorKind::Directive,
                        ".ascii requires a string operand",
                        None,
                    ));
                };
                for byte in text.bytes() {
                    out.emit_byte(byte);
                }
            }
            PseudoOp::Byte => {
                if statement.operands.is_empty() {
                    out.emit_byte(0);
                }
                for expression in &statement.operands {
                    let value = self.convert_operand_uint16(expression)?;
                    out.emit_byte((value & 0xff) as u8);
                }
            }
            PseudoOp::Hbyte => {
                if statement.operands.is_empty() {
                    out.emit_byte(0);
                }
                for expression in &statement.operands {
                    let value = self.convert_operand_uint16(expression)?;
                    out.emit_byte((value >> 8) as u8);
                }
            }
            PseudoOp::Word => {
                if statement.operands.is_empty() {
                    out.emit_word(0);
                }
                for expression in &statement.operands {
                    let value = self.convert_operand_uint16(expression)?;
                    out.emit_word(value);
                }
            }
            PseudoOp::Def => {
                let Some(Expr::Symbol(name)) = statement.operands.first() else {
                    return Err(AsmError::new(
                        AsmErrorKind::Directive,
                        ".def requires a symbol operand",
                        None,
                    ));
                };
                let expression = statement.operands.get(1).ok_or_else(|| {
                    AsmError::new(AsmErrorKind::Directive, ".def requires a value", None)
                })?;
                let value = self.convert_operand_uint16(expression)?;
                self.define_symbol(name, Value::known(value))?;
                if let Some(label) = &statement.label {
                    self.define_symbol(label, Value::known(value))?;
                }
                out.addr = value;
                out.show_address = true;
            }
            PseudoOp::Loc => {
                let expression = statement.operands.first().ok_or_else(|| {
                    AsmError::new(AsmErrorKind::Directive, ".loc requires an address", None)
                })?;
                let addr = self.convert_operand_uint16(expression)?;
                self.location_counter = addr;
                out.addr = addr;
                out.show_address = true;
            }
            PseudoOp::End => {
                self.end_reached = true;
            }
            // reserved listing/linkage controls
            PseudoOp::Link | PseudoOp::List | PseudoOp::Nolist | PseudoOp::Page => {}
        }
        Ok(())
    }

    /// Evaluate an operand to a 16-bit value. Unresolved expressions are
    /// tolerated in pass 1 and substituted with [`UNRESOLVED_OPERAND`];
    /// in pass 2 they are errors.
    fn convert_operand_uint16(&mut self, expression: &Expr) -> Result<u16, AsmError> {
        let mut ctx = EvalContext {
            symbols: &mut self.symbols,
            line: self.line_number,
        };
        let value = expression.evaluate(&mut ctx).map_err(|err| match err {
            EvalError::Value(ValueError::DivideByZero) => {
                AsmError::new(AsmErrorKind::Expression, "division by zero", None)
            }
            EvalError::Symbol(err) => AsmError::new(AsmErrorKind::Symbol, &err.to_string(), None),
            other => AsmError::new(AsmErrorKind::Expression, &other.to_string(), None),
        })?;
        match value.get() {
            Ok(resolved) => Ok(resolved),
            Err(_) if self.pass_number == 1 => Ok(UNRESOLVED_OPERAND),
            Err(_) => Err(AsmError::new(
                AsmErrorKind::Expression,
                "expression evaluation error",
                None,
            )),
        }
    }

    fn define_symbol(&mut self, symbol: &str, value: Value) -> Result<(), AsmError> {
        self.symbols
            .define(self.line_number, symbol, value)
            .map_err(|err| AsmError::new(AsmErrorKind::Symbol, &err.to_string(), None))
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}
