// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryReader, PointerValidator, POINTER_SIZE};
use std::sync::Arc;

/// The single gate to foreign memory.
pub struct MemoryAccess {
    reader: Arc<dyn MemoryReader>,
    validator: PointerValidator,
}

impl MemoryAccess {
    pub fn new(reader: Arc<dyn MemoryReader>) -> Self {
        let validator = PointerValidator::new(reader.clone());
        Self { reader, validator }
    }

    pub fn reader(&self) -> &Arc<dyn MemoryReader> {
        &self.reader
    }

    pub fn validator(&self) -> &PointerValidator {
        &self.validator
    }

    pub fn validator_mut(&mut self) -> &mut PointerValidator {
        &mut self.validator
    }

    pub fn is_ptr_readable(&self, addr: Address) -> bool {
        self.validator.is_ptr_readable(addr)
    }

    pub fn is_range_readable(&self, addr: Address, len: usize) -> bool {
        self.validator.is_range_readable(addr, len)
    }

    pub fn read_into(&self, addr: Address, buf: &mut [u8]) -> bool {
        if !self.validator.is_range_readable(addr, buf.len()) {
            return false;
        }
        match self.reader.read_into(addr, buf) {
            Ok(()) => true,
            Err(e) => {
                log::trace!("read of {} bytes at {} failed: {}", buf.len(), addr, e);
                false
            }
        }
    }

    pub fn read(&self, addr: Address, len: usize) -> Option<Vec<u8>> {
        let mut buffer = vec![0u8; len];
        self.read_into(addr, &mut buffer).then_some(buffer)
    }

    fn read_array<const N: usize>(&self, addr: Address) -> Option<[u8; N]> {
        let mut bytes = [0u8; N];
        self.read_into(addr, &mut bytes).then_some(bytes)
    }

    pub fn read_u8(&self, addr: Address) -> u8 {
        self.read_array::<1>(addr).map(|b| b[0]).unwrap_or_default()
    }

    pub fn read_u16(&self, addr: Address) -> u16 {
        self.read_array(addr).map(u16::from_le_bytes).unwrap_or_default()
    }

    pub fn read_u32(&self, addr: Address) -> u32 {
        self.read_array(addr).map(u32::from_le_bytes).unwrap_or_default()
    }

    pub fn read_i32(&self, addr: Address) -> i32 {
        self.read_array(addr).map(i32::from_le_bytes).unwrap_or_default()
    }

    pub fn read_u64(&self, addr: Address) -> u64 {
        self.read_array(addr).map(u64::from_le_bytes).unwrap_or_default()
    }

    pub fn read_ptr(&self, addr: Address) -> Address {
        Address::new(self.read_u64(addr))
    }

    /// Reads `count` consecutive pointers. Tries one bulk copy first and
    /// falls back to element reads, so a single unreadable slot reads as
    /// zero instead of blanking the whole table.
    pub fn read_ptr_array(&self, addr: Address, count: usize) -> Vec<Address> {
        if let Some(bytes) = self.read(addr, count * POINTER_SIZE as usize) {
            return bytes
                .chunks_exact(POINTER_SIZE as usize)
                .map(|c| Address::new(u64::from_le_bytes(c.try_into().unwrap_or_default())))
                .collect();
        }

        (0..count)
            .map(|i| self.read_ptr(addr + i as u64 * POINTER_SIZE))
            .collect()
    }

    pub fn read_u32_array(&self, addr: Address, count: usize) -> Vec<u32> {
        if let Some(bytes) = self.read(addr, count * 4) {
            return bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
        }

        (0..count).map(|i| self.read_u32(addr + i as u64 * 4)).collect()
    }

    pub fn read_code(&self, addr: Address, max_bytes: usize) -> Vec<u32> {
        let len = self.validator.readable_extent(addr, max_bytes) & !3;
        if len == 0 {
            return Vec::new();
        }
        match self.read(addr, len) {
            Some(bytes) => bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Narrow string, one character per byte, ending at the first zero byte
    /// or after `max_len` bytes. Bytes past the end of readable memory are
    /// not requested.
    pub fn read_string(&self, addr: Address, max_len: usize) -> String {
        let len = self.validator.readable_extent(addr, max_len);
        if len == 0 {
            return String::new();
        }
        let Some(bytes) = self.read(addr, len) else {
            return String::new();
        };
        bytes
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }

    pub fn read_wide_string(&self, addr: Address, max_len: usize) -> String {
        let len = self.validator.readable_extent(addr, max_len.saturating_mul(2)) & !1;
        if len == 0 {
            return String::new();
        }
        let Some(bytes) = self.read(addr, len) else {
            return String::new();
        };
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .take_while(|&u| u != 0)
            .collect();
        String::from_utf16_lossy(&units)
    }
}
