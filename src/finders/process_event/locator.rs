// Sat Oct 17 2026 - Alex

use crate::analysis::arm64::decode_stream;
use crate::finders::process_event::features::{score_instructions, FeatureSignals, FeatureVector};
use crate::memory::{Address, MemoryAccess};
use crate::utils::logging::ScopedTimer;
use serde::{Deserialize, Serialize};

/// Mangled name of `UObject::ProcessEvent(UFunction*, void*)`.
pub const PROCESS_EVENT_SYMBOL: &str = "_ZN7UObject12ProcessEventEP9UFunctionPv";

pub const VTABLE_SCAN_SLOTS: usize = 100;

pub const SLOT_CODE_BYTES: usize = 0x200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocateMethod {
    Symbol,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatedFunction {
    pub address: Address,
    pub slot_index: usize,
    pub score: u32,
    pub method: LocateMethod,
}

/// Finds ProcessEvent in an object's vtable.
pub struct ProcessEventLocator<'a> {
    access: &'a MemoryAccess,
    signals: FeatureSignals,
    symbol: Option<Address>,
}

impl<'a> ProcessEventLocator<'a> {
    pub fn new(access: &'a MemoryAccess, signals: FeatureSignals) -> Self {
        Self {
            access,
            signals,
            symbol: None,
        }
    }

    pub fn with_symbol(mut self, symbol: Option<Address>) -> Self {
        self.symbol = symbol.filter(|s| !s.is_null());
        self
    }

    pub fn score_slot(&self, code: Address) -> FeatureVector {
        if code.is_null() {
            return FeatureVector::default();
        }
        let words = self.access.read_code(code, SLOT_CODE_BYTES);
        let instructions = decode_stream(&words, code);
        score_instructions(&instructions, &self.signals, |addr| self.access.read_ptr(addr))
    }

    pub fn locate(&self, object: Address) -> Option<LocatedFunction> {
        let _timer = ScopedTimer::new("process event scan");

        let vtable = self.access.read_ptr(object);
        if vtable.is_null() {
            log::debug!("object {} has no readable vtable", object);
            return None;
        }
        let slots = self.access.read_ptr_array(vtable, VTABLE_SCAN_SLOTS);

        let mut best: Option<LocatedFunction> = None;
        for (index, &code) in slots.iter().enumerate() {
            if self.symbol == Some(code) {
                log::debug!("slot {} matches exported symbol at {}", index, code);
                return Some(LocatedFunction {
                    address: code,
                    slot_index: index,
                    score: FeatureVector::full().score(),
                    method: LocateMethod::Symbol,
                });
            }

            let vector = self.score_slot(code);
            let score = vector.score();
            if score > 0 {
                log::trace!("slot {:3} {} score {} [{}]", index, code, score, vector);
            }

            if score > best.as_ref().map_or(0, |b| b.score) {
                best = Some(LocatedFunction {
                    address: code,
                    slot_index: index,
                    score,
                    method: LocateMethod::Heuristic,
                });
            }
        }

        match &best {
            Some(found) => log::debug!(
                "best candidate slot {} at {} with score {}",
                found.slot_index,
                found.address,
                found.score
            ),
            None => log::debug!("no vtable slot of {} carried any signal", object),
        }
        best
    }
}
