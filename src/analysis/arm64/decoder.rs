// Thu Oct 15 2026 - Alex

use super::{Instruction, InstructionKind};
use crate::memory::Address;

pub struct InstructionDecoder;

impl InstructionDecoder {
    /// Decodes one instruction word. `address` is only used to resolve the
    /// target of ADR/ADRP; pass zero when it is not known.
    pub fn decode(insn: u32, address: Address) -> Instruction {
        if (insn & 0x1F00_0000) == 0x1000_0000 {
            return Self::decode_pc_rel(insn, address);
        }
        if (insn & 0x1F00_0000) == 0x1100_0000 {
            return Self::decode_add_sub_imm(insn, address);
        }
        if (insn & 0x1F80_0000) == 0x1280_0000 {
            return Self::decode_move_wide_imm(insn, address);
        }
        if (insn & 0x3B00_0000) == 0x3900_0000 {
            return Self::decode_load_store_unsigned_imm(insn, address);
        }
        if (insn & 0x3B20_0000) == 0x3800_0000 {
            return Self::decode_load_store_imm9(insn, address);
        }
        Instruction::unknown(insn, address)
    }

    fn decode_pc_rel(insn: u32, address: Address) -> Instruction {
        let is_page = (insn >> 31) & 1 == 1;
        let rd = (insn & 0x1F) as u8;
        let immlo = ((insn >> 29) & 0x3) as u64;
        let immhi = ((insn >> 5) & 0x7FFFF) as u64;
        let imm = sign_extend((immhi << 2) | immlo, 21);

        let (kind, mnemonic, immediate, target) = if is_page {
            let imm = imm << 12;
            let page = address.align_down(0x1000);
            (InstructionKind::Adrp, "adrp", imm, page.offset(imm))
        } else {
            (InstructionKind::Adr, "adr", imm, address.offset(imm))
        };

        Instruction {
            kind,
            mnemonic,
            raw: insn,
            address,
            rd: Some(rd),
            rn: None,
            immediate,
            target,
            is_64bit: true,
        }
    }

    fn decode_add_sub_imm(insn: u32, address: Address) -> Instruction {
        let sf = (insn >> 31) & 1;
        let op = (insn >> 30) & 1;
        let s = (insn >> 29) & 1;
        let sh = (insn >> 22) & 1;
        let imm12 = ((insn >> 10) & 0xFFF) as i64;
        let rn = ((insn >> 5) & 0x1F) as u8;
        let rd = (insn & 0x1F) as u8;

        // sub, adds and subs (cmp/cmn) never complete an address
        if op != 0 || s != 0 {
            return Instruction::unknown(insn, address);
        }

        Instruction {
            kind: InstructionKind::Add,
            mnemonic: "add",
            raw: insn,
            address,
            rd: Some(rd),
            rn: Some(rn),
            immediate: if sh == 1 { imm12 << 12 } else { imm12 },
            target: Address::zero(),
            is_64bit: sf == 1,
        }
    }

    fn decode_move_wide_imm(insn: u32, address: Address) -> Instruction {
        let sf = (insn >> 31) & 1;
        let opc = (insn >> 29) & 0x3;
        let hw = (insn >> 21) & 0x3;
        let imm16 = ((insn >> 5) & 0xFFFF) as u64;
        let rd = (insn & 0x1F) as u8;
        let is_64bit = sf == 1;

        if !is_64bit && hw > 1 {
            return Instruction::unknown(insn, address);
        }

        let shifted = imm16 << (hw * 16);
        let (mnemonic, value) = match opc {
            0b10 => ("movz", shifted),
            0b00 if is_64bit => ("movn", !shifted),
            0b00 => ("movn", !shifted & 0xFFFF_FFFF),
            // movk only patches part of the register
            _ => return Instruction::unknown(insn, address),
        };

        Instruction {
            kind: InstructionKind::MoveImmediate,
            mnemonic,
            raw: insn,
            address,
            rd: Some(rd),
            rn: None,
            immediate: if is_64bit { value as i64 } else { value as u32 as i32 as i64 },
            target: Address::zero(),
            is_64bit,
        }
    }

    fn decode_load_store_unsigned_imm(insn: u32, address: Address) -> Instruction {
        let size = (insn >> 30) & 0x3;
        let imm12 = ((insn >> 10) & 0xFFF) as i64;
        Self::decode_load_store_common(insn, address, imm12 << size)
    }

    fn decode_load_store_imm9(insn: u32, address: Address) -> Instruction {
        // bits 11:10 == 0b10 is the unprivileged ldtr/sttr family
        if (insn >> 10) & 0x3 == 0b10 {
            return Instruction::unknown(insn, address);
        }
        let imm9 = sign_extend(((insn >> 12) & 0x1FF) as u64, 9);
        Self::decode_load_store_common(insn, address, imm9)
    }

    fn decode_load_store_common(insn: u32, address: Address, immediate: i64) -> Instruction {
        let size = (insn >> 30) & 0x3;
        let v = (insn >> 26) & 1;
        let opc = (insn >> 22) & 0x3;
        let rt = (insn & 0x1F) as u8;
        let rn = ((insn >> 5) & 0x1F) as u8;

        if v == 1 {
            return Instruction::unknown(insn, address);
        }

        let (kind, mnemonic, is_64bit) = match (size, opc) {
            (0b00, 0b00) => (InstructionKind::Store, "strb", false),
            (0b00, 0b01) => (InstructionKind::LoadByte, "ldrb", false),
            (0b00, 0b10) => (InstructionKind::LoadByte, "ldrsb", true),
            (0b00, 0b11) => (InstructionKind::LoadByte, "ldrsb", false),
            (0b01, 0b00) => (InstructionKind::Store, "strh", false),
            (0b01, 0b01) => (InstructionKind::Load, "ldrh", false),
            (0b01, 0b10) => (InstructionKind::Load, "ldrsh", true),
            (0b01, 0b11) => (InstructionKind::Load, "ldrsh", false),
            (0b10, 0b00) => (InstructionKind::Store, "str", false),
            (0b10, 0b01) => (InstructionKind::Load, "ldr", false),
            (0b10, 0b10) => (InstructionKind::Load, "ldrsw", true),
            (0b11, 0b00) => (InstructionKind::Store, "str", true),
            (0b11, 0b01) => (InstructionKind::Load, "ldr", true),
            _ => return Instruction::unknown(insn, address),
        };

        Instruction {
            kind,
            mnemonic,
            raw: insn,
            address,
            rd: Some(rt),
            rn: Some(rn),
            immediate,
            target: Address::zero(),
            is_64bit,
        }
    }
}

pub fn decode(insn: u32, address: Address) -> Instruction {
    InstructionDecoder::decode(insn, address)
}

pub fn decode_stream(words: &[u32], base: Address) -> Vec<Instruction> {
    words
        .iter()
        .enumerate()
        .map(|(i, &w)| InstructionDecoder::decode(w, base + i as u64 * 4))
        .collect()
}

fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::arm64::InstructionEncoder;

    #[test]
    fn test_adrp_forward_and_backward() {
        let pc = Address::new(0x1_0000_4abc);
        let insn = decode(InstructionEncoder::encode_adrp(8, pc, Address::new(0x1_0123_4000)), pc);
        assert_eq!(insn.kind, InstructionKind::Adrp);
        assert_eq!(insn.rd, Some(8));
        assert_eq!(insn.target, Address::new(0x1_0123_4000));

        let insn = decode(InstructionEncoder::encode_adrp(1, pc, Address::new(0x0_ffff_0000)), pc);
        assert_eq!(insn.target, Address::new(0x0_ffff_0000));
    }

    #[test]
    fn test_adrp_known_encoding() {
        // adrp x8, #0x1000 at 0x0
        let insn = decode(0xB000_0008, Address::zero());
        assert_eq!(insn.kind, InstructionKind::Adrp);
        assert_eq!(insn.target, Address::new(0x1000));
    }

    #[test]
    fn test_adr() {
        // adr x0, #-4
        let pc = Address::new(0x1000);
        let insn = decode(0x10FF_FFE0, pc);
        assert_eq!(insn.kind, InstructionKind::Adr);
        assert_eq!(insn.target, Address::new(0x0FFC));
    }

    #[test]
    fn test_add_immediate() {
        // add x8, x8, #0x5a0
        let insn = decode(0x9116_8108, Address::zero());
        assert_eq!(insn.kind, InstructionKind::Add);
        assert_eq!(insn.rd, Some(8));
        assert_eq!(insn.rn, Some(8));
        assert_eq!(insn.immediate, 0x5a0);
    }

    #[test]
    fn test_sub_and_cmp_are_not_add() {
        // sub sp, sp, #0x40
        assert!(!decode(0xD101_03FF, Address::zero()).is_valid());
        // cmp w8, #0x1
        assert!(!decode(0x7100_051F, Address::zero()).is_valid());
    }

    #[test]
    fn test_ldr_unsigned_offsets_are_scaled() {
        // ldr x0, [x1, #0x10]
        let insn = decode(0xF940_0820, Address::zero());
        assert_eq!(insn.kind, InstructionKind::Load);
        assert_eq!(insn.immediate, 0x10);
        assert_eq!(insn.rn, Some(1));
        assert_eq!(insn.rd, Some(0));

        // ldr w8, [x0, #0xc]
        assert_eq!(decode(0xB940_0C08, Address::zero()).immediate, 0xc);
        // ldrsw x8, [x0, #0x58]
        let insn = decode(0xB980_5808, Address::zero());
        assert_eq!(insn.mnemonic, "ldrsw");
        assert_eq!(insn.immediate, 0x58);
    }

    #[test]
    fn test_byte_and_half_loads() {
        // ldrb w8, [x1, #0xb1]
        let insn = decode(0x3942_C428, Address::zero());
        assert_eq!(insn.kind, InstructionKind::LoadByte);
        assert_eq!(insn.immediate, 0xb1);

        // ldrh w8, [x0, #0x8e]
        let insn = decode(0x7941_1C08, Address::zero());
        assert_eq!(insn.kind, InstructionKind::Load);
        assert_eq!(insn.immediate, 0x8e);
    }

    #[test]
    fn test_store() {
        // str x8, [x0, #0x18]
        let insn = decode(0xF900_0C08, Address::zero());
        assert_eq!(insn.kind, InstructionKind::Store);
        assert_eq!(insn.immediate, 0x18);
    }

    #[test]
    fn test_ldur_negative_offset() {
        // ldur x8, [x29, #-8]
        let insn = decode(0xF85F_83A8, Address::zero());
        assert_eq!(insn.kind, InstructionKind::Load);
        assert_eq!(insn.immediate, -8);
        assert_eq!(insn.rn, Some(29));
    }

    #[test]
    fn test_move_wide() {
        // mov w9, #0x18
        let insn = decode(0x5280_0309, Address::zero());
        assert_eq!(insn.kind, InstructionKind::MoveImmediate);
        assert_eq!(insn.immediate, 0x18);
        assert_eq!(insn.rn, None);

        // movz x0, #0x1, lsl #16
        assert_eq!(decode(0xD2A0_0020, Address::zero()).immediate, 0x10000);
        // mov x0, #-1 (movn x0, #0)
        assert_eq!(decode(0x9280_0000, Address::zero()).immediate, -1);
        // movk x0, #0x1234 is not decoded
        assert!(!decode(0xF282_4680, Address::zero()).is_valid());
    }

    #[test]
    fn test_unknown() {
        // ret
        let insn = decode(0xD65F_03C0, Address::zero());
        assert!(!insn.is_valid());
        // nop
        assert!(!decode(0xD503_201F, Address::zero()).is_valid());
        // ldr q0, [x1] (SIMD)
        assert!(!decode(0x3DC0_0020, Address::zero()).is_valid());
    }

    #[test]
    fn test_decode_stream_addresses() {
        let insns = decode_stream(&[0xD503_201F, 0xD503_201F], Address::new(0x4000));
        assert_eq!(insns[1].address, Address::new(0x4004));
    }
}
