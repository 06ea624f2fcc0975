// Thu Oct 15 2026 - Alex

use crate::memory::Address;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Adr,
    Adrp,
    Add,
    Load,
    LoadByte,
    Store,
    MoveImmediate,
    Unknown,
}

/// One decoded A64 instruction. Fields of an `Unknown` one must not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub mnemonic: &'static str,
    pub raw: u32,
    pub address: Address,
    pub rd: Option<u8>,
    pub rn: Option<u8>,
    pub immediate: i64,
    pub target: Address,
    pub is_64bit: bool,
}

impl Instruction {
    pub fn unknown(raw: u32, address: Address) -> Self {
        Self {
            kind: InstructionKind::Unknown,
            mnemonic: ".word",
            raw,
            address,
            rd: None,
            rn: None,
            immediate: 0,
            target: Address::zero(),
            is_64bit: false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kind != InstructionKind::Unknown
    }

    pub fn is_address_compute(&self) -> bool {
        matches!(self.kind, InstructionKind::Adr | InstructionKind::Adrp)
    }

    pub fn completes(&self, producer: &Instruction) -> bool {
        self.is_valid() && self.immediate != 0 && producer.rd.is_some() && self.rn == producer.rd
    }
}

fn reg_name(reg: u8, is_64bit: bool) -> String {
    match (reg, is_64bit) {
        (31, true) => "sp".to_string(),
        (31, false) => "wsp".to_string(),
        (r, true) => format!("x{}", r),
        (r, false) => format!("w{}", r),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rd = self.rd.map(|r| reg_name(r, self.is_64bit)).unwrap_or_default();
        match self.kind {
            InstructionKind::Unknown => write!(f, ".word 0x{:08x}", self.raw),
            InstructionKind::Adr | InstructionKind::Adrp => {
                write!(f, "{} {}, {}", self.mnemonic, rd, self.target)
            }
            InstructionKind::MoveImmediate => {
                write!(f, "{} {}, #0x{:x}", self.mnemonic, rd, self.immediate)
            }
            InstructionKind::Add => {
                let rn = self.rn.map(|r| reg_name(r, self.is_64bit)).unwrap_or_default();
                write!(f, "{} {}, {}, #0x{:x}", self.mnemonic, rd, rn, self.immediate)
            }
            InstructionKind::Load | InstructionKind::LoadByte | InstructionKind::Store => {
                let rn = self.rn.map(|r| reg_name(r, true)).unwrap_or_default();
                write!(f, "{} {}, [{}, #{}]", self.mnemonic, rd, rn, self.immediate)
            }
        }
    }
}
