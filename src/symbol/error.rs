// Sat Oct 17 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("Symbol not found: {0}")]
    NotFound(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] goblin::error::Error),
}
