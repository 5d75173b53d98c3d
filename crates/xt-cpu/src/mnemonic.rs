/// Opcode name for instruction traces. Group opcodes are resolved through
/// the ModRM `reg` field.
pub fn mnemonic(opcode: u8, reg: u8) -> &'static str {
    const ALU: [&str; 8] = ["ADD", "OR", "ADC", "SBB", "AND", "SUB", "XOR", "CMP"];
    const SHIFT: [&str; 8] = ["ROL", "ROR", "RCL", "RCR", "SHL", "SHR", "???", "SAR"];
    const GROUP3: [&str; 8] = ["TEST", "???", "NOT", "NEG", "MUL", "IMUL", "DIV", "IDIV"];
    const GROUP5: [&str; 8] = ["INC", "DEC", "CALL", "CALL", "JMP", "JMP", "PUSH", "???"];
    const JCC: [&str; 16] = [
        "JO", "JNO", "JB", "JNB", "JZ", "JNZ", "JBE", "JA", "JS", "JNS", "JPE", "JPO", "JL", "JGE",
        "JLE", "JG",
    ];

    let reg = usize::from(reg & 7);
    match opcode {
        0x00..=0x3F => match opcode & 7 {
            0..=5 => ALU[usize::from(opcode >> 3)],
            6 if opcode < 0x20 => "PUSH",
            7 if opcode < 0x20 => "POP",
            _ => match opcode {
                0x26 => "ES:",
                0x2E => "CS:",
                0x36 => "SS:",
                0x3E => "DS:",
                0x27 => "DAA",
                0x2F => "DAS",
                0x37 => "AAA",
                _ => "AAS",
            },
        },
        0x40..=0x47 => "INC",
        0x48..=0x4F => "DEC",
        0x50..=0x57 => "PUSH",
        0x58..=0x5F => "POP",
        0x70..=0x7F => JCC[usize::from(opcode & 0x0F)],
        0x80..=0x83 => ALU[reg],
        0x84 | 0x85 | 0xA8 | 0xA9 => "TEST",
        0x86 | 0x87 => "XCHG",
        0x88..=0x8C | 0x8E | 0xA0..=0xA3 | 0xB0..=0xBF | 0xC6 | 0xC7 => "MOV",
        0x8D => "LEA",
        0x8F => "POP",
        0x90 => "NOP",
        0x91..=0x97 => "XCHG",
        0x98 => "CBW",
        0x99 => "CWD",
        0x9A | 0xE8 => "CALL",
        0x9B => "WAIT",
        0x9C => "PUSHF",
        0x9D => "POPF",
        0x9E => "SAHF",
        0x9F => "LAHF",
        0xA4 | 0xA5 => "MOVS",
        0xA6 | 0xA7 => "CMPS",
        0xAA | 0xAB => "STOS",
        0xAC | 0xAD => "LODS",
        0xAE | 0xAF => "SCAS",
        0xC2 | 0xC3 => "RET",
        0xC4 => "LES",
        0xC5 => "LDS",
        0xCA | 0xCB => "RETF",
        0xCC | 0xCD => "INT",
        0xCE => "INTO",
        0xCF => "IRET",
        0xD0..=0xD3 => SHIFT[reg],
        0xD4 => "AAM",
        0xD5 => "AAD",
        0xD7 => "XLAT",
        0xD8..=0xDF => "ESC",
        0xE0 => "LOOPNZ",
        0xE1 => "LOOPZ",
        0xE2 => "LOOP",
        0xE3 => "JCXZ",
        0xE4 | 0xE5 | 0xEC | 0xED => "IN",
        0xE6 | 0xE7 | 0xEE | 0xEF => "OUT",
        0xE9..=0xEB => "JMP",
        0xF0 => "LOCK",
        0xF2 => "REPNZ",
        0xF3 => "REPZ",
        0xF4 => "HLT",
        0xF5 => "CMC",
        0xF6 | 0xF7 => GROUP3[reg],
        0xF8 => "CLC",
        0xF9 => "STC",
        0xFA => "CLI",
        0xFB => "STI",
        0xFC => "CLD",
        0xFD => "STD",
        0xFE | 0xFF => GROUP5[reg],
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::mnemonic;

    #[test]
    fn groups_use_reg_field() {
        assert_eq!(mnemonic(0x80, 7), "CMP");
        assert_eq!(mnemonic(0xD1, 4), "SHL");
        assert_eq!(mnemonic(0xF7, 6), "DIV");
        assert_eq!(mnemonic(0xFF, 6), "PUSH");
    }

    #[test]
    fn plain_opcodes() {
        assert_eq!(mnemonic(0x05, 0), "ADD");
        assert_eq!(mnemonic(0x1E, 0), "PUSH");
        assert_eq!(mnemonic(0x3F, 0), "AAS");
        assert_eq!(mnemonic(0x74, 0), "JZ");
        assert_eq!(mnemonic(0xEA, 0), "JMP");
        assert_eq!(mnemonic(0x60, 0), "???");
    }
}
