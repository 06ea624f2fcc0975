// Sat Oct 17 2026 - Alex

pub mod error;
pub mod image;

pub use error::SymbolError;
pub use image::ImageSymbols;

use crate::memory::Address;

pub trait SymbolLookup {
    /// Runtime address of `name`, also trying the Mach-O style name with
    /// one extra leading underscore.
    fn find_symbol(&self, name: &str) -> Option<Address>;
}
