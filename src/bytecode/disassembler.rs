//! Textual listing of a chunk, for debugging and the `dump` command.

use std::fmt::Write as _;

use crate::bytecode::chunk::Chunk;

/// Render a chunk as a two-section listing: `.text` with one line per
/// instruction, `.data` with one line per NUL-terminated constant run.
/// Decoding stops at the first malformed instruction.
pub fn disassemble_chunk(chunk: &Chunk) -> String {
    let mut out = String::new();

    out.push_str("section .text:\n");
    out.push_str(" global _main\n\n");
    out.push_str("_main:\n");

    let mut offset = 0;
    while let Some((instruction, width)) = chunk.instruction_at(offset) {
        let _ = writeln!(out, " {:04}\t{}", offset, instruction);
        offset += width;
    }

    out.push_str("\n.section .data:\n");
    let mut i = 0;
    while i < chunk.constants.len() {
        let _ = write!(out, " {:04}\t", i);
        while i < chunk.constants.len() && chunk.constants[i] != 0 {
            let byte = chunk.constants[i];
            if byte.is_ascii_graphic() || byte == b' ' {
                out.push(byte as char);
            } else {
                let _ = write!(out, "0x{:X}", byte);
            }
            i += 1;
        }
        i += 1;
        out.push('\n');
    }

    out
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&disassemble_chunk(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::compiler::Compiler;
    use crate::lexer::Scanner;
    use crate::parser::Parser;

    fn disassemble_source(source: &str) -> String {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let program = Parser::new(tokens).parse().unwrap();
        let chunk = Compiler::new().compile(&program).unwrap();
        disassemble_chunk(&chunk)
    }

    #[test]
    fn test_listing_layout() {
        let listing = disassemble_source("\"ab\" + \"c\"");
        assert_eq!(
            listing,
            "section .text:\n \
             global _main\n\
             \n\
             _main:\n \
             0000\tstr.load 0x00000000 0x00000002\n \
             0009\tstr.load 0x00000003 0x00000001\n \
             0018\tstr.add\n \
             0019\tpop\n\
             \n\
             .section .data:\n \
             0000\tab\n \
             0003\tc\n"
        );
    }

    #[test]
    fn test_operand_hex_width_matches_schedule() {
        let listing = disassemble_source("var a = 1; a");
        assert!(listing.contains("i32.load 0x00000001"));
        assert!(listing.contains("slot.store 0x0000"));
        assert!(listing.contains("slot.load 0x0000"));
    }

    #[test]
    fn test_nonprintable_constants_are_hex_escaped() {
        let listing = disassemble_source("\"a\tb\"");
        assert!(listing.contains(" 0000\ta0x9b\n"));
    }

    #[test]
    fn test_empty_chunk() {
        let listing = disassemble_chunk(&Chunk::new());
        assert_eq!(
            listing,
            "section .text:\n global _main\n\n_main:\n\n.section .data:\n"
        );
    }
}
