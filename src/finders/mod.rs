// Sat Oct 17 2026 - Alex

pub mod process_event;

pub use process_event::{LocateMethod, LocatedFunction, ProcessEventLocator};
