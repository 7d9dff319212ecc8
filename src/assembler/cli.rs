// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and output path derivation.

use clap::Parser;

pub const VERSION: &str = "1.0";

const SOURCE_SUFFIX: &str = ".p65";
const OBJECT_SUFFIX: &str = ".bin";
const LISTING_SUFFIX: &str = ".lst";

#[derive(Parser, Debug)]
#[command(
    name = "pal65",
    version = VERSION,
    about = "PAL65-dialect 6502 cross-assembler",
    long_about = "PAL65-dialect 6502 cross-assembler.

Addressing modes are spelled as mnemonic suffixes (lda# for immediate,
ldax for X-indexed, jmp@ for indirect). The assembler makes two passes
over the source and writes an addressed-hex object file plus a listing."
)]
pub struct Cli {
    #[arg(
        value_name = "FILE",
        long_help = "Source filename. A .p65 suffix is stripped to form the output base; .bin and .lst are appended for the object and listing files."
    )]
    pub source: String,
}

/// Parse arguments; `--help`/`--version` exit 0, argument errors exit 1.
pub fn parse_args() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = i32::from(err.use_stderr());
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

#[must_use]
pub fn output_base(source: &str) -> &str {
    source.strip_suffix(SOURCE_SUFFIX).unwrap_or(source)
}

#[must_use]
pub fn object_path(source: &str) -> String {
    format!("{}{}", output_base(source), OBJECT_SUFFIX)
}

#[must_use]
pub fn listing_path(source: &str) -> String {
    format!("{}{}", output_base(source), LISTING_SUFFIX)
}
