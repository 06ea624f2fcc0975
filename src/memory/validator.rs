// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryReader, MemoryRegion};
use crate::utils::logging::ScopedTimer;
use std::sync::Arc;

/// Answers "may this address be read" from a snapshot of the target's
/// memory map.
pub struct PointerValidator {
    reader: Arc<dyn MemoryReader>,
    regions: Vec<MemoryRegion>,
    use_cache: bool,
}

impl PointerValidator {
    pub fn new(reader: Arc<dyn MemoryReader>) -> Self {
        Self {
            reader,
            regions: Vec::new(),
            use_cache: false,
        }
    }

    pub fn refresh_region_cache(&mut self) -> usize {
        let _timer = ScopedTimer::new("region cache refresh");
        self.regions = Self::query_sorted(&*self.reader);
        if self.regions.is_empty() {
            log::warn!("region cache refresh returned no regions");
        } else {
            log::debug!("cached {} memory regions", self.regions.len());
        }
        self.regions.len()
    }

    pub fn cached_regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub fn set_use_cache(&mut self, use_cache: bool) {
        self.use_cache = use_cache;
    }

    pub fn uses_cache(&self) -> bool {
        self.use_cache
    }

    pub fn is_ptr_readable(&self, addr: Address) -> bool {
        self.is_range_readable(addr, 1)
    }

    /// True iff every byte of `[addr, addr + len)` lies in a readable region.
    /// A zero length is checked as a single byte.
    pub fn is_range_readable(&self, addr: Address, len: usize) -> bool {
        let len = len.max(1);
        if addr.is_null() || addr.checked_add(len as u64).is_none() {
            return false;
        }
        self.readable_extent(addr, len) == len
    }

    pub fn readable_extent(&self, addr: Address, max: usize) -> usize {
        if addr.is_null() {
            return 0;
        }
        if self.use_cache {
            readable_extent_in(&self.regions, addr, max)
        } else {
            readable_extent_in(&Self::query_sorted(&*self.reader), addr, max)
        }
    }

    fn query_sorted(reader: &dyn MemoryReader) -> Vec<MemoryRegion> {
        match reader.get_regions() {
            Ok(mut regions) => {
                regions.sort_by_key(|r| r.start());
                regions
            }
            Err(e) => {
                log::debug!("region query failed: {}", e);
                Vec::new()
            }
        }
    }
}

fn readable_extent_in(regions: &[MemoryRegion], addr: Address, max: usize) -> usize {
    let mut cursor = addr;
    let mut remaining = max as u64;

    while remaining > 0 {
        let idx = regions.partition_point(|r| r.start() <= cursor);
        if idx == 0 {
            break;
        }
        let region = &regions[idx - 1];
        if !region.contains(cursor) || !region.is_readable() {
            break;
        }
        let take = (region.end().as_u64() - cursor.as_u64()).min(remaining);
        cursor = cursor + take;
        remaining -= take;
    }

    max - remaining as usize
}
