// Tue Oct 13 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRegion};

/// Raw access to a target address space.
pub trait MemoryReader: Send + Sync {
    fn read_into(&self, addr: Address, buf: &mut [u8]) -> Result<(), MemoryError>;

    fn get_regions(&self) -> Result<Vec<MemoryRegion>, MemoryError>;

    fn get_base_address(&self) -> Address;

    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let mut buffer = vec![0u8; len];
        self.read_into(addr, &mut buffer)?;
        Ok(buffer)
    }
}
