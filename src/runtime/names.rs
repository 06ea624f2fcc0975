// Fri Oct 16 2026 - Alex

use crate::memory::{Address, MemoryAccess, POINTER_SIZE};
use crate::runtime::offsets::{FNameEntryOffsets, FNamePoolEntryOffsets, FNamePoolOffsets};
use once_cell::unsync::OnceCell;

pub const MAX_NAME_BUFFER: usize = 1024;

pub const LEGACY_ELEMENTS_PER_CHUNK: i32 = 16384;

pub enum NameEncoding {
    Legacy {
        entry: FNameEntryOffsets,
        gnames: OnceCell<Address>,
    },
    Pool {
        pool: FNamePoolOffsets,
        entry: FNamePoolEntryOffsets,
        outline_numbers: bool,
    },
}

/// Turns name ids into display strings.
///
/// Every failure path yields an empty string; callers cannot tell an
/// unreadable entry from an empty one.
pub struct NameResolver {
    names_ptr: Address,
    encoding: NameEncoding,
    max_name_length: usize,
}

impl NameResolver {
    pub fn legacy(names_ptr: Address, entry: FNameEntryOffsets) -> Self {
        Self {
            names_ptr,
            encoding: NameEncoding::Legacy {
                entry,
                gnames: OnceCell::new(),
            },
            max_name_length: MAX_NAME_BUFFER,
        }
    }

    pub fn pool(
        names_ptr: Address,
        pool: FNamePoolOffsets,
        entry: FNamePoolEntryOffsets,
        outline_numbers: bool,
    ) -> Self {
        Self {
            names_ptr,
            encoding: NameEncoding::Pool {
                pool,
                entry,
                outline_numbers,
            },
            max_name_length: MAX_NAME_BUFFER,
        }
    }

    pub fn with_max_name_length(mut self, max: usize) -> Self {
        self.max_name_length = max.clamp(1, MAX_NAME_BUFFER);
        self
    }

    pub fn names_ptr(&self) -> Address {
        self.names_ptr
    }

    pub fn is_pool(&self) -> bool {
        matches!(self.encoding, NameEncoding::Pool { .. })
    }

    pub fn entry_address(&self, access: &MemoryAccess, id: i32) -> Address {
        if id < 0 || self.names_ptr.is_null() {
            return Address::zero();
        }

        match &self.encoding {
            NameEncoding::Legacy { gnames, .. } => {
                let gnames = self.legacy_base(access, gnames);
                if gnames.is_null() {
                    return Address::zero();
                }
                let chunk = (id / LEGACY_ELEMENTS_PER_CHUNK) as u64;
                let within = (id % LEGACY_ELEMENTS_PER_CHUNK) as u64;

                let entries = access.read_ptr(gnames + chunk * POINTER_SIZE);
                if entries.is_null() {
                    return Address::zero();
                }
                access.read_ptr(entries + within * POINTER_SIZE)
            }
            NameEncoding::Pool { pool, .. } => {
                let slot = self.names_ptr + pool.blocks_off + pool.block_index(id) * POINTER_SIZE;
                let block = access.read_ptr(slot);
                if block.is_null() {
                    return Address::zero();
                }
                block + pool.offset_in_block(id)
            }
        }
    }

    pub fn resolve_name(&self, access: &MemoryAccess, id: i32) -> String {
        let entry = self.entry_address(access, id);
        if entry.is_null() {
            return String::new();
        }

        match &self.encoding {
            NameEncoding::Legacy { entry: layout, .. } => self.read_legacy_entry(access, entry, layout),
            NameEncoding::Pool {
                entry: layout,
                outline_numbers,
                ..
            } => self.read_pool_entry(access, entry, layout, *outline_numbers),
        }
    }

    fn legacy_base(&self, access: &MemoryAccess, cell: &OnceCell<Address>) -> Address {
        if let Some(gnames) = cell.get() {
            return *gnames;
        }
        let gnames = access.read_ptr(self.names_ptr);
        if !gnames.is_null() {
            log::debug!("legacy name array at {}", gnames);
            let _ = cell.set(gnames);
        }
        gnames
    }

    fn read_legacy_entry(&self, access: &MemoryAccess, entry: Address, layout: &FNameEntryOffsets) -> String {
        if access.read(entry + layout.index, 4).is_none() {
            return String::new();
        }
        access.read_string(entry + layout.name, self.max_name_length)
    }

    fn read_pool_entry(
        &self,
        access: &MemoryAccess,
        mut entry: Address,
        layout: &FNamePoolEntryOffsets,
        outline_numbers: bool,
    ) -> String {
        let Some(mut header) = read_header(access, entry, layout) else {
            return String::new();
        };

        let mut number = 0;
        if outline_numbers && layout.get_length(header) == 0 {
            let id_addr = entry + layout.forward_id_offset();
            let forward_id = access.read_i32(id_addr);
            if forward_id <= 0 {
                return String::new();
            }
            number = access.read_i32(id_addr + 4);

            // One hop only: the target is read as a plain entry.
            entry = self.entry_address(access, forward_id);
            if entry.is_null() {
                return String::new();
            }
            header = match read_header(access, entry, layout) {
                Some(header) => header,
                None => return String::new(),
            };
        }

        let len = layout.get_length(header).min(self.max_name_length);
        if len == 0 {
            return String::new();
        }
        if layout.is_wide(header) {
            log::trace!("wide name entry at {} read as narrow", entry);
        }

        let mut name = access.read_string(entry + layout.string_offset(), len);
        if number > 0 {
            name.push('_');
            name.push_str(&(number - 1).to_string());
        }
        name
    }
}

fn read_header(access: &MemoryAccess, entry: Address, layout: &FNamePoolEntryOffsets) -> Option<u16> {
    access
        .read(entry + layout.header, 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
}
