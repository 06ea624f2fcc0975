// Thu Oct 15 2026 - Alex

use crate::memory::Address;

pub const NOP: u32 = 0xD503201F;
pub const RET: u32 = 0xD65F03C0;

pub struct InstructionEncoder;

impl InstructionEncoder {
    pub fn encode_adr(rd: u8, pc: Address, target: Address) -> u32 {
        let offset = target - pc;
        let rd = (rd & 0x1F) as u32;
        let immlo = (offset as u32) & 0x3;
        let immhi = ((offset >> 2) as u32) & 0x7FFFF;
        (immlo << 29) | 0x10000000 | (immhi << 5) | rd
    }

    pub fn encode_adrp(rd: u8, pc: Address, target: Address) -> u32 {
        let pages = (target.as_u64() >> 12) as i64 - (pc.as_u64() >> 12) as i64;
        let rd = (rd & 0x1F) as u32;
        let immlo = (pages as u32) & 0x3;
        let immhi = ((pages >> 2) as u32) & 0x7FFFF;
        (immlo << 29) | 0x90000000 | (immhi << 5) | rd
    }

    pub fn encode_add_imm(rd: u8, rn: u8, imm12: u16, is_64bit: bool) -> u32 {
        let sf = if is_64bit { 1u32 } else { 0u32 };
        let rd = (rd & 0x1F) as u32;
        let rn = (rn & 0x1F) as u32;
        let imm = (imm12 & 0xFFF) as u32;
        (sf << 31) | 0x11000000 | (imm << 10) | (rn << 5) | rd
    }

    pub fn encode_movz(rd: u8, imm16: u16, is_64bit: bool) -> u32 {
        let sf = if is_64bit { 1u32 } else { 0u32 };
        let rd = (rd & 0x1F) as u32;
        (sf << 31) | 0x52800000 | ((imm16 as u32) << 5) | rd
    }

    pub fn encode_ldr(rt: u8, rn: u8, offset: u32) -> u32 {
        Self::encode_load_store(0b11, 0b01, rt, rn, offset)
    }

    pub fn encode_ldr_w(rt: u8, rn: u8, offset: u32) -> u32 {
        Self::encode_load_store(0b10, 0b01, rt, rn, offset)
    }

    pub fn encode_ldrb(rt: u8, rn: u8, offset: u32) -> u32 {
        Self::encode_load_store(0b00, 0b01, rt, rn, offset)
    }

    fn encode_load_store(size: u32, opc: u32, rt: u8, rn: u8, offset: u32) -> u32 {
        let imm12 = (offset >> size) & 0xFFF;
        let rt = (rt & 0x1F) as u32;
        let rn = (rn & 0x1F) as u32;
        (size << 30) | 0x39000000 | (opc << 22) | (imm12 << 10) | (rn << 5) | rt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encodings() {
        assert_eq!(InstructionEncoder::encode_ldr(0, 1, 0x10), 0xF9400820);
        assert_eq!(InstructionEncoder::encode_ldrb(8, 1, 0xb1), 0x3942C428);
        assert_eq!(InstructionEncoder::encode_movz(9, 0x18, false), 0x52800309);
        assert_eq!(InstructionEncoder::encode_add_imm(8, 8, 0x5a0, true), 0x91168108);
        assert_eq!(InstructionEncoder::encode_adrp(8, Address::zero(), Address::new(0x1000)), 0xB0000008);
    }
}
