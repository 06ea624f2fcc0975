// Sat Oct 17 2026 - Alex

pub mod features;
pub mod locator;

pub use features::{score_instructions, Feature, FeatureSignals, FeatureVector};
pub use locator::{
    LocateMethod, LocatedFunction, ProcessEventLocator, PROCESS_EVENT_SYMBOL, SLOT_CODE_BYTES, VTABLE_SCAN_SLOTS,
};
