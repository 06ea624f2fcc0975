// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryAccess, POINTER_SIZE};

/// Returns the first pointer-aligned address in `[start, start + range)`
/// whose pointer-sized content equals `target`, or zero.
pub fn find_aligned_pointer_reference(
    access: &MemoryAccess,
    start: Address,
    range: u64,
    target: Address,
) -> Address {
    if start.is_null() || !start.is_pointer_aligned() {
        return Address::zero();
    }
    if range < POINTER_SIZE || range % POINTER_SIZE != 0 {
        return Address::zero();
    }

    let mut offset = 0u64;
    while offset + POINTER_SIZE <= range {
        let candidate = start + offset;
        if access.read_ptr(candidate) == target {
            return candidate;
        }
        offset += POINTER_SIZE;
    }

    Address::zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Protection, SnapshotMemory};
    use std::sync::Arc;

    const START: u64 = 0x8000;
    const SLOTS: u64 = 64;

    fn access_with_value_at(slot: u64, value: u64) -> MemoryAccess {
        let mut memory = SnapshotMemory::new();
        memory
            .map_zeroed("data", Address::new(START), (SLOTS * POINTER_SIZE) as usize, Protection::READ_WRITE)
            .unwrap();
        memory.write_u64(Address::new(START + slot * POINTER_SIZE), value).unwrap();
        let mut access = MemoryAccess::new(Arc::new(memory));
        access.validator_mut().set_use_cache(true);
        access.validator_mut().refresh_region_cache();
        access
    }

    #[test]
    fn test_finds_value_at_every_boundary() {
        let target = Address::new(0x1234_5678);
        for slot in [0, 1, SLOTS / 2, SLOTS - 1] {
            let access = access_with_value_at(slot, target.as_u64());
            let found = find_aligned_pointer_reference(
                &access,
                Address::new(START),
                SLOTS * POINTER_SIZE,
                target,
            );
            assert_eq!(found, Address::new(START + slot * POINTER_SIZE));
        }
    }

    #[test]
    fn test_missing_value() {
        let access = access_with_value_at(3, 0x55);
        let found = find_aligned_pointer_reference(&access, Address::new(START), SLOTS * POINTER_SIZE, Address::new(0x66));
        assert!(found.is_null());
    }

    #[test]
    fn test_misaligned_input_returns_zero() {
        let access = access_with_value_at(0, 0x55);
        let target = Address::new(0x55);
        assert!(find_aligned_pointer_reference(&access, Address::new(START + 4), 64, target).is_null());
        assert!(find_aligned_pointer_reference(&access, Address::new(START), 60, target).is_null());
        assert!(find_aligned_pointer_reference(&access, Address::new(START), 4, target).is_null());
        assert!(find_aligned_pointer_reference(&access, Address::zero(), 64, target).is_null());
    }
}
