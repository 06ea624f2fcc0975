// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRange, MemoryReader, MemoryRegion, Protection};

#[derive(Debug, Clone)]
struct Segment {
    range: MemoryRange,
    protection: Protection,
    name: String,
    data: Vec<u8>,
}

/// Address space reconstructed from byte buffers placed at fixed virtual
/// addresses, e.g. segments of a memory dump.
#[derive(Debug, Clone, Default)]
pub struct SnapshotMemory {
    segments: Vec<Segment>,
    base_address: Address,
}

impl SnapshotMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_address(mut self, base: Address) -> Self {
        self.base_address = base;
        self
    }

    pub fn map(
        &mut self,
        name: &str,
        start: Address,
        data: Vec<u8>,
        protection: Protection,
    ) -> Result<(), MemoryError> {
        let range = MemoryRange::from_start_size(start, data.len() as u64);
        if range.is_empty() {
            return Err(MemoryError::InvalidAddress(format!("empty segment at {}", start)));
        }
        if self.segments.iter().any(|s| s.range.overlaps(&range)) {
            return Err(MemoryError::InvalidAddress(format!("segment {} overlaps {}", name, range)));
        }

        self.segments.push(Segment {
            range,
            protection,
            name: name.to_string(),
            data,
        });
        self.segments.sort_by_key(|s| s.range.start());
        Ok(())
    }

    pub fn map_zeroed(
        &mut self,
        name: &str,
        start: Address,
        size: usize,
        protection: Protection,
    ) -> Result<(), MemoryError> {
        self.map(name, start, vec![0u8; size], protection)
    }

    pub fn write(&mut self, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let segment = self
            .segments
            .iter_mut()
            .find(|s| s.range.contains(addr))
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))?;

        let offset = (addr.as_u64() - segment.range.start().as_u64()) as usize;
        let end = offset + bytes.len();
        if end > segment.data.len() {
            return Err(MemoryError::OutOfBounds(addr.as_u64() + bytes.len() as u64));
        }
        segment.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_u16(&mut self, addr: Address, value: u16) -> Result<(), MemoryError> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, addr: Address, value: u32) -> Result<(), MemoryError> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_i32(&mut self, addr: Address, value: i32) -> Result<(), MemoryError> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_u64(&mut self, addr: Address, value: u64) -> Result<(), MemoryError> {
        self.write(addr, &value.to_le_bytes())
    }

    pub fn write_ptr(&mut self, addr: Address, value: Address) -> Result<(), MemoryError> {
        self.write_u64(addr, value.as_u64())
    }

    pub fn write_words(&mut self, addr: Address, words: &[u32]) -> Result<(), MemoryError> {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.write(addr, &bytes)
    }
}

impl MemoryReader for SnapshotMemory {
    fn read_into(&self, addr: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        let mut copied = 0usize;
        while copied < buf.len() {
            let cursor = addr + copied as u64;
            let segment = self
                .segments
                .iter()
                .find(|s| s.range.contains(cursor))
                .ok_or(MemoryError::ReadFailed(cursor.as_u64()))?;

            let offset = (cursor.as_u64() - segment.range.start().as_u64()) as usize;
            let chunk = (segment.data.len() - offset).min(buf.len() - copied);
            buf[copied..copied + chunk].copy_from_slice(&segment.data[offset..offset + chunk]);
            copied += chunk;
        }
        Ok(())
    }

    fn get_regions(&self) -> Result<Vec<MemoryRegion>, MemoryError> {
        Ok(self
            .segments
            .iter()
            .map(|s| MemoryRegion::new(s.range, s.protection, s.name.clone()))
            .collect())
    }

    fn get_base_address(&self) -> Address {
        self.base_address
    }
}
