// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Index from dialect (suffix-fused) mnemonics to instruction entries.
//!
//! Construction validates the static table: opcodes must be unique, and a
//! dialect mnemonic may map to at most two entries, which must then be a
//! zero-page/absolute sibling pair in (1, 2) operand-size order. Violations
//! are defects in the table itself and abort the program.

use std::collections::BTreeMap;

use crate::m6502::table::{InstructionEntry, MAIN_INSTRUCTION_TABLE};

#[derive(Debug)]
pub struct InstructionSet {
    by_mnemonic: BTreeMap<String, Vec<InstructionEntry>>,
}

impl InstructionSet {
    #[must_use]
    pub fn new() -> Self {
        let mut opcode_used = [false; 256];
        let mut by_mnemonic: BTreeMap<String, Vec<InstructionEntry>> = BTreeMap::new();

        for entry in MAIN_INSTRUCTION_TABLE {
            if opcode_used[entry.opcode as usize] {
                panic!("internal error: duplicate opcode {:02x}", entry.opcode);
            }
            opcode_used[entry.opcode as usize] = true;

            let fused = format!("{}{}", entry.mnemonic, entry.mode.dialect_suffix());
            if let Some(existing) = by_mnemonic.get(&fused) {
                if existing.len() > 1 || !existing[0].mode.zero_page_sibling(entry.mode) {
                    panic!("internal error: duplicate dialect mnemonic {fused}");
                }
            }
            by_mnemonic.entry(fused).or_default().push(*entry);
        }

        for (mnemonic, entries) in &by_mnemonic {
            if entries.len() == 2
                && (entries[0].mode.operand_size() != 1 || entries[1].mode.operand_size() != 2)
            {
                panic!("internal error: instruction {mnemonic} with wrong modes");
            }
        }

        Self { by_mnemonic }
    }

    #[must_use]
    pub fn valid_mnemonic(&self, mnemonic: &str) -> bool {
        self.by_mnemonic
            .contains_key(&mnemonic.to_ascii_lowercase())
    }

    /// Entries for a dialect mnemonic: one, or a zero-page/absolute pair.
    #[must_use]
    pub fn get(&self, mnemonic: &str) -> Option<&[InstructionEntry]> {
        self.by_mnemonic
            .get(&mnemonic.to_ascii_lowercase())
            .map(Vec::as_slice)
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::InstructionSet;
    use crate::m6502::AddressMode;

    #[test]
    fn builds_without_table_defects() {
        let set = InstructionSet::new();
        assert!(set.valid_mnemonic("nop"));
    }

    #[test]
    fn mnemonic_lookup_is_case_insensitive() {
        let set = InstructionSet::new();
        assert!(set.valid_mnemonic("LDA"));
        assert!(set.valid_mnemonic("Lda#"));
        assert!(!set.valid_mnemonic("mov"));
    }

    #[test]
    fn suffix_fusion_produces_expected_spellings() {
        let set = InstructionSet::new();
        let immediate = set.get("lda#").unwrap();
        assert_eq!(immediate.len(), 1);
        assert_eq!(immediate[0].opcode, 0xa9);
        assert_eq!(immediate[0].mode, AddressMode::Immediate);

        let x_indirect = set.get("ldax@").unwrap();
        assert_eq!(x_indirect[0].opcode, 0xa1);

        let indirect_y = set.get("lda@y").unwrap();
        assert_eq!(indirect_y[0].opcode, 0xb1);

        let jmp_indirect = set.get("jmp@").unwrap();
        assert_eq!(jmp_indirect[0].opcode, 0x6c);

        let accumulator = set.get("asla").unwrap();
        assert_eq!(accumulator[0].opcode, 0x0a);
        assert_eq!(accumulator[0].mode.operand_size(), 0);

        assert!(set.get("ldq").is_none());
    }

    #[test]
    fn every_mnemonic_has_one_entry_or_a_sized_pair() {
        let set = InstructionSet::new();
        for entries in set.by_mnemonic.values() {
            match entries.len() {
                1 => {}
                2 => {
                    assert!(entries[0].mode.zero_page_sibling(entries[1].mode));
                    assert_eq!(entries[0].mode.operand_size(), 1);
                    assert_eq!(entries[1].mode.operand_size(), 2);
                }
                n => panic!("mnemonic with {n} entries"),
            }
        }
    }

    #[test]
    fn dual_width_pairs_exist_for_directly_addressed_loads() {
        let set = InstructionSet::new();
        let lda = set.get("lda").unwrap();
        assert_eq!(lda.len(), 2);
        assert_eq!(lda[0].opcode, 0xa5);
        assert_eq!(lda[1].opcode, 0xad);

        let ldxy = set.get("ldxy").unwrap();
        assert_eq!(ldxy.len(), 2);
        assert_eq!(ldxy[0].mode, AddressMode::ZeroPageY);
        assert_eq!(ldxy[1].mode, AddressMode::AbsoluteY);
    }
}
