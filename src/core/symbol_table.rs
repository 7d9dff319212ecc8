// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Symbol table for labels and .def constants.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolTableError {
    Undefined(String),
    MultiplyDefined {
        symbol: String,
        first_line: u32,
        second_line: u32,
    },
    ValueRedefined {
        symbol: String,
        old_value: u16,
        new_value: u16,
    },
}

impl fmt::Display for SymbolTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolTableError::Undefined(symbol) => write!(f, "symbol {symbol} undefined"),
            SymbolTableError::MultiplyDefined {
                symbol,
                first_line,
                second_line,
            } => write!(
                f,
                "symbol \"{symbol}\" multiply defined, lines {first_line} and {second_line}"
            ),
            SymbolTableError::ValueRedefined {
                symbol,
                old_value,
                new_value,
            } => write!(
                f,
                "symbol \"{symbol}\" value redefined from 0x{old_value:04x} to 0x{new_value:04x}"
            ),
        }
    }
}

impl std::error::Error for SymbolTableError {}

#[derive(Debug, Clone)]
pub struct SymbolTableEntry {
    pub value: Value,
    pub definition_line: u32,
    pub reference_lines: BTreeSet<u32>,
}

/// Mapping from case-folded symbol name to definition and reference sites.
///
/// The `lookup_undefined_ok` bit is set by the assembler driver: during
/// pass 1 an undefined symbol resolves to a fresh unknown [`Value`]; during
/// pass 2 it is an error.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: BTreeMap<String, SymbolTableEntry>,
    lookup_undefined_ok: bool,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_lookup_undefined_ok(&mut self, value: bool) {
        self.lookup_undefined_ok = value;
    }

    /// Define a symbol at a source line.
    ///
    /// A second define from the same line with the same resolved value is
    /// idempotent; this is what lets pass 2 re-define everything pass 1
    /// defined. A define from a different line is a hard error.
    pub fn define(
        &mut self,
        line: u32,
        symbol: &str,
        value: Value,
    ) -> Result<(), SymbolTableError> {
        match self.entries.get(symbol) {
            None => {
                self.entries.insert(
                    symbol.to_string(),
                    SymbolTableEntry {
                        value,
                        definition_line: line,
                        reference_lines: BTreeSet::new(),
                    },
                );
                Ok(())
            }
            Some(entry) if entry.definition_line != line => {
                Err(SymbolTableError::MultiplyDefined {
                    symbol: symbol.to_string(),
                    first_line: entry.definition_line,
                    second_line: line,
                })
            }
            Some(entry) => match (entry.value.get(), value.get()) {
                (Ok(old_value), Ok(new_value)) if old_value != new_value => {
                    Err(SymbolTableError::ValueRedefined {
                        symbol: symbol.to_string(),
                        old_value,
                        new_value,
                    })
                }
                _ => Ok(()),
            },
        }
    }

    /// Look up a symbol, recording the referencing line.
    ///
    /// An undefined symbol yields a fresh unknown when the mode bit allows
    /// it; no placeholder entry is created, so the reference site is not
    /// recorded in that case.
    pub fn lookup(&mut self, line: u32, symbol: &str) -> Result<Value, SymbolTableError> {
        match self.entries.get_mut(symbol) {
            Some(entry) => {
                entry.reference_lines.insert(line);
                Ok(entry.value.clone())
            }
            None if self.lookup_undefined_ok => Ok(Value::unknown(symbol)),
            None => Err(SymbolTableError::Undefined(symbol.to_string())),
        }
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    pub fn definition_line(&self, symbol: &str) -> Result<u32, SymbolTableError> {
        self.entries
            .get(symbol)
            .map(|entry| entry.definition_line)
            .ok_or_else(|| SymbolTableError::Undefined(symbol.to_string()))
    }

    pub fn references(&self, symbol: &str) -> Result<&BTreeSet<u32>, SymbolTableError> {
        self.entries
            .get(symbol)
            .map(|entry| &entry.reference_lines)
            .ok_or_else(|| SymbolTableError::Undefined(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{SymbolTable, SymbolTableError};
    use crate::core::value::Value;

    #[test]
    fn define_and_lookup() {
        let mut table = SymbolTable::new();
        table.define(3, "loop", Value::known(0x200)).unwrap();
        assert!(table.contains("loop"));
        assert_eq!(table.lookup(7, "loop"), Ok(Value::known(0x200)));
        assert_eq!(table.definition_line("loop"), Ok(3));
        let refs = table.references("loop").unwrap();
        assert!(refs.contains(&7));
    }

    #[test]
    fn redefine_from_other_line_is_fatal() {
        let mut table = SymbolTable::new();
        table.define(1, "foo", Value::known(0)).unwrap();
        assert_eq!(
            table.define(2, "foo", Value::known(0)),
            Err(SymbolTableError::MultiplyDefined {
                symbol: "foo".to_string(),
                first_line: 1,
                second_line: 2,
            })
        );
    }

    #[test]
    fn same_line_redefinition_is_idempotent() {
        let mut table = SymbolTable::new();
        table.define(4, "here", Value::known(0x10)).unwrap();
        // pass 2 re-definition with an unchanged value
        table.define(4, "here", Value::known(0x10)).unwrap();
        assert_eq!(
            table.define(4, "here", Value::known(0x11)),
            Err(SymbolTableError::ValueRedefined {
                symbol: "here".to_string(),
                old_value: 0x10,
                new_value: 0x11,
            })
        );
    }

    #[test]
    fn undefined_lookup_depends_on_mode_bit() {
        let mut table = SymbolTable::new();
        table.set_lookup_undefined_ok(true);
        let value = table.lookup(5, "later").unwrap();
        assert!(!value.is_known());
        // the speculative lookup did not create an entry
        assert!(!table.contains("later"));
        assert!(table.references("later").is_err());

        table.set_lookup_undefined_ok(false);
        assert_eq!(
            table.lookup(6, "later"),
            Err(SymbolTableError::Undefined("later".to_string()))
        );
    }
}
