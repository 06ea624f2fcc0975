// Thu Oct 15 2026 - Alex

use crate::analysis::arm64::{decode, decode_stream, Instruction};
use crate::memory::{Address, MemoryAccess};

pub const ADRL_SEARCH_WINDOW: usize = 7;

pub fn resolve_in_stream(instructions: &[Instruction], index: usize) -> Option<Address> {
    let base = instructions.get(index)?;
    if !base.is_address_compute() {
        return None;
    }

    instructions
        .iter()
        .skip(index + 1)
        .take(ADRL_SEARCH_WINDOW)
        .find(|insn| insn.completes(base))
        .map(|insn| base.target.offset(insn.immediate))
}

/// Reconstructs an address the compiler split across an ADR/ADRP and a
/// later add or load, reading the code from the target.
///
/// With `imm_insn_offset` the displacement is taken from exactly that
/// instruction (byte offset from `adrp_address`) without a register check;
/// otherwise the next [`ADRL_SEARCH_WINDOW`] instructions are scanned for a
/// def-use match. Returns zero on any failure.
pub fn decode_adrl(access: &MemoryAccess, adrp_address: Address, imm_insn_offset: Option<u32>) -> Address {
    if adrp_address.is_null() {
        return Address::zero();
    }

    let adrp_raw = access.read_u32(adrp_address);
    if adrp_raw == 0 {
        return Address::zero();
    }
    let adrp = decode(adrp_raw, adrp_address);
    if !adrp.is_address_compute() {
        return Address::zero();
    }

    match imm_insn_offset {
        Some(offset) if offset != 0 => {
            let imm_address = adrp_address + offset as u64;
            let imm_raw = access.read_u32(imm_address);
            if imm_raw == 0 {
                return Address::zero();
            }
            let imm = decode(imm_raw, imm_address);
            if imm.is_valid() && imm.immediate != 0 {
                adrp.target.offset(imm.immediate)
            } else {
                Address::zero()
            }
        }
        _ => {
            let words = access.read_code(adrp_address, (ADRL_SEARCH_WINDOW + 1) * 4);
            let instructions = decode_stream(&words, adrp_address);
            resolve_in_stream(&instructions, 0).unwrap_or_default()
        }
    }
}
