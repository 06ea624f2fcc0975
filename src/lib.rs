// Sun Oct 18 2026 - Alex

//! Live introspection of Unreal Engine games on ARM64.
//!
//! All access to the target goes through [`memory::MemoryAccess`], which
//! checks every read against a cached map of readable regions. On top of
//! it sit the name table decoder and the ProcessEvent locator, both owned
//! by a [`runtime::Session`].

pub mod analysis;
pub mod config;
pub mod finders;
pub mod memory;
pub mod output;
pub mod runtime;
pub mod symbol;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use memory::{Address, MemoryAccess, MemoryReader};
pub use runtime::{InitError, Session};
