// Fri Oct 16 2026 - Alex

use crate::config::Config;
use crate::memory::{Address, MemoryReader};
use crate::runtime::names::MAX_NAME_BUFFER;
use crate::runtime::offsets::UeOffsets;

/// Per-game knowledge a session needs: where the globals live and how the
/// runtime lays out its objects.
pub trait GameProfile {
    fn executable_base(&self, reader: &dyn MemoryReader) -> Address {
        reader.get_base_address()
    }

    fn offsets(&self) -> Option<&UeOffsets>;

    fn names_ptr(&self, base: Address) -> Address;

    fn guobject_array_ptr(&self, base: Address) -> Address;

    fn is_using_fname_pool(&self) -> bool;

    fn is_using_outline_number_name(&self) -> bool;

    fn use_region_cache(&self) -> bool {
        true
    }

    fn max_name_length(&self) -> usize {
        MAX_NAME_BUFFER
    }

    fn excluded_objects(&self) -> Vec<String> {
        Vec::new()
    }
}

pub struct ConfigProfile {
    config: Config,
}

impl ConfigProfile {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl GameProfile for ConfigProfile {
    fn executable_base(&self, reader: &dyn MemoryReader) -> Address {
        if let Some(hint) = self.config.executable.as_deref().filter(|h| !h.is_empty()) {
            if let Ok(regions) = reader.get_regions() {
                let base = regions
                    .iter()
                    .filter(|r| r.name().ends_with(hint))
                    .map(|r| r.start())
                    .min();
                if let Some(base) = base {
                    return base;
                }
            }
            log::debug!("no region named like '{}', using backend base", hint);
        }
        reader.get_base_address()
    }

    fn offsets(&self) -> Option<&UeOffsets> {
        self.config.offsets.as_ref()
    }

    fn names_ptr(&self, base: Address) -> Address {
        base + self.config.names_rva
    }

    fn guobject_array_ptr(&self, base: Address) -> Address {
        base + self.config.guobject_array_rva
    }

    fn is_using_fname_pool(&self) -> bool {
        self.config.use_fname_pool
    }

    fn is_using_outline_number_name(&self) -> bool {
        self.config.use_outline_number_name
    }

    fn use_region_cache(&self) -> bool {
        self.config.use_region_cache
    }

    fn max_name_length(&self) -> usize {
        self.config.max_name_length
    }

    fn excluded_objects(&self) -> Vec<String> {
        self.config.excluded_objects.clone()
    }
}
