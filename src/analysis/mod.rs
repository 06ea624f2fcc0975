// Thu Oct 15 2026 - Alex

pub mod adrl;
pub mod arm64;

pub use adrl::{decode_adrl, resolve_in_stream, ADRL_SEARCH_WINDOW};
pub use arm64::{Instruction, InstructionDecoder, InstructionKind};
