// Tue Oct 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Read failed at address 0x{0:x}")]
    ReadFailed(u64),
    #[error("Short read at address 0x{address:x}: wanted {wanted} bytes, got {got}")]
    ShortRead { address: u64, wanted: usize, got: usize },
    #[error("Process not found: {0}")]
    ProcessNotFound(String),
    #[error("Out of bounds: address 0x{0:x} not in range")]
    OutOfBounds(u64),
    #[error("Not supported: {0}")]
    NotSupported(String),
}
