// Thu Oct 15 2026 - Alex

pub mod decoder;
pub mod encoding;
pub mod instruction;

pub use decoder::{decode, decode_stream, InstructionDecoder};
pub use encoding::InstructionEncoder;
pub use instruction::{Instruction, InstructionKind};
