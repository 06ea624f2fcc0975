// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, MemoryRegion, ProcessMemory};

/// Reader for the caller's own address space that copies with a plain
/// memcpy instead of going through the kernel.
pub struct LocalMemory {
    process: ProcessMemory,
}

impl LocalMemory {
    /// # Safety
    ///
    /// Reads are raw pointer copies. The caller must guarantee every read is
    /// preceded by a readability check against a current region snapshot.
    pub unsafe fn new() -> Result<Self, MemoryError> {
        Ok(Self {
            process: ProcessMemory::current()?,
        })
    }
}

impl MemoryReader for LocalMemory {
    fn read_into(&self, addr: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        if addr.is_null() {
            return Err(MemoryError::InvalidAddress(addr.to_string()));
        }
        unsafe {
            std::ptr::copy_nonoverlapping(addr.as_ptr(), buf.as_mut_ptr(), buf.len());
        }
        Ok(())
    }

    fn get_regions(&self) -> Result<Vec<MemoryRegion>, MemoryError> {
        self.process.enumerate_regions()
    }

    fn get_base_address(&self) -> Address {
        self.process.get_base_address()
    }
}
