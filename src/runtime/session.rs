// Sat Oct 17 2026 - Alex

use crate::finders::process_event::{FeatureSignals, LocatedFunction, ProcessEventLocator, PROCESS_EVENT_SYMBOL};
use crate::memory::{find_aligned_pointer_reference, Address, MemoryAccess, MemoryReader};
use crate::runtime::error::InitError;
use crate::runtime::names::NameResolver;
use crate::runtime::offsets::UeOffsets;
use crate::runtime::profile::GameProfile;
use crate::symbol::SymbolLookup;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Runtime globals resolved once when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeHandles {
    pub base_address: Address,
    pub names_ptr: Address,
    pub guobject_array: Address,
    pub obj_objects: Address,
    pub objects: Address,
}

/// One attached target.
pub struct Session {
    access: MemoryAccess,
    offsets: UeOffsets,
    handles: RuntimeHandles,
    names: NameResolver,
    process_event_symbol: Option<Address>,
    excluded_objects: Vec<String>,
}

impl Session {
    pub fn init(
        reader: Arc<dyn MemoryReader>,
        profile: &dyn GameProfile,
        symbols: Option<&dyn SymbolLookup>,
    ) -> Result<Self, InitError> {
        let mut access = MemoryAccess::new(reader.clone());
        access.validator_mut().set_use_cache(true);
        if access.validator_mut().refresh_region_cache() == 0 {
            return Err(InitError::PtrValidator);
        }

        let base_address = profile.executable_base(&*reader);
        if base_address.is_null() {
            return Err(InitError::ExecutableNotFound);
        }
        log::debug!("executable base {}", base_address);

        let offsets = profile
            .offsets()
            .cloned()
            .ok_or_else(|| InitError::Offsets("profile has no offsets catalogue".to_string()))?;

        let use_pool = profile.is_using_fname_pool();
        let names_ptr = profile.names_ptr(base_address);
        if !access.is_ptr_readable(names_ptr) {
            return Err(if use_pool {
                InitError::NamePool(names_ptr)
            } else {
                InitError::GNames(names_ptr)
            });
        }
        let names = Self::build_name_resolver(&offsets, names_ptr, use_pool, profile)?;
        log::debug!("names at {} ({})", names_ptr, if use_pool { "pool" } else { "legacy" });

        let guobject_array = profile.guobject_array_ptr(base_address);
        if !access.is_ptr_readable(guobject_array) {
            return Err(InitError::GUObjectArray(guobject_array));
        }

        let obj_objects = guobject_array + offsets.fuobject_array.obj_objects;
        let objects_field = obj_objects + offsets.tuobject_array.objects;
        let objects = access
            .read(objects_field, 8)
            .map(|b| Address::new(u64::from_le_bytes(b.try_into().unwrap_or_default())))
            .ok_or(InitError::ObjObjects(objects_field))?;
        log::debug!("GUObjectArray {} objects {}", guobject_array, objects);

        let process_event_symbol = symbols.and_then(|s| s.find_symbol(PROCESS_EVENT_SYMBOL));
        if let Some(symbol) = process_event_symbol {
            log::debug!("ProcessEvent exported at {}", symbol);
        }

        access.validator_mut().set_use_cache(profile.use_region_cache());

        Ok(Self {
            access,
            offsets,
            handles: RuntimeHandles {
                base_address,
                names_ptr,
                guobject_array,
                obj_objects,
                objects,
            },
            names,
            process_event_symbol,
            excluded_objects: profile.excluded_objects(),
        })
    }

    fn build_name_resolver(
        offsets: &UeOffsets,
        names_ptr: Address,
        use_pool: bool,
        profile: &dyn GameProfile,
    ) -> Result<NameResolver, InitError> {
        let resolver = if use_pool {
            match (offsets.fname_pool, offsets.fname_pool_entry) {
                (Some(pool), Some(entry)) => {
                    NameResolver::pool(names_ptr, pool, entry, profile.is_using_outline_number_name())
                }
                _ => return Err(InitError::Offsets("FNamePool/FNamePoolEntry".to_string())),
            }
        } else {
            match offsets.fname_entry {
                Some(entry) => NameResolver::legacy(names_ptr, entry),
                None => return Err(InitError::Offsets("FNameEntry".to_string())),
            }
        };
        Ok(resolver.with_max_name_length(profile.max_name_length()))
    }

    pub fn handles(&self) -> &RuntimeHandles {
        &self.handles
    }

    pub fn access(&self) -> &MemoryAccess {
        &self.access
    }

    pub fn offsets(&self) -> &UeOffsets {
        &self.offsets
    }

    pub fn names(&self) -> &NameResolver {
        &self.names
    }

    pub fn resolve_name(&self, id: i32) -> String {
        self.names.resolve_name(&self.access, id)
    }

    pub fn process_event_symbol(&self) -> Option<Address> {
        self.process_event_symbol
    }

    pub fn locate_process_event(&self, object: Address) -> Option<LocatedFunction> {
        let signals = FeatureSignals::new(&self.offsets, self.handles.guobject_array, self.handles.obj_objects);
        ProcessEventLocator::new(&self.access, signals)
            .with_symbol(self.process_event_symbol)
            .locate(object)
    }

    pub fn refresh_regions(&mut self) -> usize {
        self.access.validator_mut().refresh_region_cache()
    }

    pub fn set_use_cache(&mut self, use_cache: bool) {
        self.access.validator_mut().set_use_cache(use_cache);
    }

    pub fn find_aligned_pointer(&self, start: Address, range: u64, target: Address) -> Address {
        find_aligned_pointer_reference(&self.access, start, range, target)
    }

    pub fn object_at(&self, index: i32) -> Address {
        if index < 0 || self.handles.objects.is_null() {
            return Address::zero();
        }
        let item = self.handles.objects + index as u64 * self.offsets.fuobject_item.size;
        self.access.read_ptr(item + self.offsets.fuobject_item.object)
    }

    /// Element count of the object array, when the catalogue knows where
    /// it is kept.
    pub fn object_count(&self) -> Option<i32> {
        let field = self.offsets.tuobject_array.num_elements;
        if field == 0 {
            return None;
        }
        let bytes = self.access.read(self.handles.obj_objects + field, 4)?;
        Some(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn object_scan_limit(&self, requested: usize) -> i32 {
        let requested = i32::try_from(requested).unwrap_or(i32::MAX);
        match self.object_count() {
            Some(n) if n >= 0 => requested.min(n),
            _ => requested,
        }
    }

    pub fn object_name(&self, object: Address) -> String {
        let field = self.offsets.uobject.name_private;
        if object.is_null() || field == 0 {
            return String::new();
        }
        match self.access.read(object + field, 4) {
            Some(b) => self.resolve_name(i32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            None => String::new(),
        }
    }

    pub fn is_excluded(&self, full_name: &str) -> bool {
        self.excluded_objects.iter().any(|e| e == full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::arm64::encoding::RET;
    use crate::analysis::arm64::InstructionEncoder as Enc;
    use crate::config::Config;
    use crate::finders::process_event::LocateMethod;
    use crate::memory::{Protection, SnapshotMemory};
    use crate::runtime::offsets::*;
    use crate::runtime::profile::ConfigProfile;
    use crate::symbol::ImageSymbols;

    const BASE: u64 = 0x1_0000_0000;
    const NAMES_RVA: u64 = 0x0800_0000;
    const GUOBJECT_RVA: u64 = 0x0800_1000;
    const BLOCK0: u64 = 0x2_0000_0000;
    const ITEMS: u64 = 0x2_1000_0000;
    const OBJECT: u64 = 0x2_2000_0000;
    const VTABLE: u64 = 0x2_2100_0000;
    const CODE: u64 = BASE + 0x4000;

    fn offsets() -> UeOffsets {
        UeOffsets {
            fname_entry: None,
            fname_pool: Some(FNamePoolOffsets { blocks_bit: 16, blocks_off: 0x10, stride: 2 }),
            fname_pool_entry: Some(FNamePoolEntryOffsets::default()),
            fuobject_array: FUObjectArrayOffsets { obj_objects: 0x10 },
            tuobject_array: TUObjectArrayOffsets { objects: 0, num_elements: 0x14 },
            fuobject_item: FUObjectItemOffsets { object: 0, size: 0x18 },
            uobject: UObjectOffsets { internal_index: 0xc, class_private: 0x10, name_private: 0x18, outer_private: 0x20 },
            ustruct: UStructOffsets { properties_size: 0x58, children: 0x48, child_properties: 0x50 },
            ufunction: UFunctionOffsets { function_flags: 0xb0, param_size: 0xb6 },
        }
    }

    fn config() -> Config {
        let mut config = Config::new().with_offsets(offsets());
        config.names_rva = NAMES_RVA;
        config.guobject_array_rva = GUOBJECT_RVA;
        config.use_outline_number_name = true;
        config
    }

    fn target() -> SnapshotMemory {
        let mut memory = SnapshotMemory::new().with_base_address(Address::new(BASE));
        memory.map_zeroed("Game", Address::new(BASE), 0x1000, Protection::READ).unwrap();
        memory
            .map_zeroed("Game", Address::new(BASE + 0x1000), 0x10000, Protection::READ_EXECUTE)
            .unwrap();
        memory
            .map_zeroed("Game", Address::new(BASE + NAMES_RVA), 0x2000, Protection::READ_WRITE)
            .unwrap();
        memory.map_zeroed("names", Address::new(BLOCK0), 0x1000, Protection::READ_WRITE).unwrap();
        memory.map_zeroed("items", Address::new(ITEMS), 0x1000, Protection::READ_WRITE).unwrap();
        memory.map_zeroed("object", Address::new(OBJECT), 0x100, Protection::READ_WRITE).unwrap();
        memory.map_zeroed("vtable", Address::new(VTABLE), 0x400, Protection::READ).unwrap();

        let names = BASE + NAMES_RVA;
        memory.write_ptr(Address::new(names + 0x10), Address::new(BLOCK0)).unwrap();
        memory.write_u16(Address::new(BLOCK0), 4 << 6).unwrap();
        memory.write(Address::new(BLOCK0 + 2), b"None").unwrap();
        memory.write_u16(Address::new(BLOCK0 + 8), 6 << 6).unwrap();
        memory.write(Address::new(BLOCK0 + 10), b"Object").unwrap();
        memory.write_u16(Address::new(BLOCK0 + 20), 0).unwrap();
        memory.write_i32(Address::new(BLOCK0 + 22), 4).unwrap();
        memory.write_i32(Address::new(BLOCK0 + 26), 6).unwrap();

        let guobject = BASE + GUOBJECT_RVA;
        memory.write_ptr(Address::new(guobject + 0x10), Address::new(ITEMS)).unwrap();
        memory.write_i32(Address::new(guobject + 0x10 + 0x14), 2).unwrap();
        memory.write_ptr(Address::new(ITEMS + 0x18), Address::new(OBJECT)).unwrap();

        memory.write_ptr(Address::new(OBJECT), Address::new(VTABLE)).unwrap();
        memory.write_i32(Address::new(OBJECT + 0x18), 10).unwrap();
        for slot in 0..100u64 {
            let pc = Address::new(CODE + slot * 0x200);
            memory.write_ptr(Address::new(VTABLE + slot * 8), pc).unwrap();
            memory.write_words(pc, &[RET]).unwrap();
        }
        let pe = Address::new(CODE + 66 * 0x200);
        memory
            .write_words(
                pe,
                &[
                    Enc::encode_adrp(8, pe, Address::new(guobject)),
                    Enc::encode_add_imm(8, 8, (guobject & 0xFFF) as u16, true),
                    Enc::encode_ldr_w(9, 0, 0xc),
                    Enc::encode_ldrb(10, 1, 0xb1),
                    Enc::encode_add_imm(11, 1, 0xb6, true),
                    RET,
                ],
            )
            .unwrap();
        memory
    }

    fn init(memory: SnapshotMemory, config: Config) -> Result<Session, InitError> {
        Session::init(Arc::new(memory), &ConfigProfile::new(config), None)
    }

    #[test]
    fn test_init_resolves_handles() {
        let session = init(target(), config()).unwrap();
        let handles = session.handles();
        assert_eq!(handles.base_address, Address::new(BASE));
        assert_eq!(handles.names_ptr, Address::new(BASE + NAMES_RVA));
        assert_eq!(handles.guobject_array, Address::new(BASE + GUOBJECT_RVA));
        assert_eq!(handles.obj_objects, Address::new(BASE + GUOBJECT_RVA + 0x10));
        assert_eq!(handles.objects, Address::new(ITEMS));
        assert!(session.access().validator().uses_cache());
    }

    #[test]
    fn test_names_and_objects() {
        let session = init(target(), config()).unwrap();
        assert_eq!(session.resolve_name(0), "None");
        assert_eq!(session.resolve_name(4), "Object");
        assert_eq!(session.resolve_name(10), "Object_5");
        assert_eq!(session.resolve_name(-1), "");

        assert_eq!(session.object_count(), Some(2));
        assert!(session.object_at(0).is_null());
        assert_eq!(session.object_at(1), Address::new(OBJECT));
        assert!(session.object_at(-1).is_null());
        assert_eq!(session.object_name(Address::new(OBJECT)), "Object_5");
    }

    #[test]
    fn test_object_scan_limit() {
        let session = init(target(), config()).unwrap();
        assert_eq!(session.object_scan_limit(1), 1);
        assert_eq!(session.object_scan_limit(usize::MAX), 2);

        let mut config = config();
        config.offsets.as_mut().unwrap().tuobject_array.num_elements = 0;
        let session = init(target(), config).unwrap();
        assert_eq!(session.object_count(), None);
        assert_eq!(session.object_scan_limit(usize::MAX), i32::MAX);
        assert_eq!(session.object_scan_limit(5), 5);
    }

    #[test]
    fn test_locate_through_session() {
        let session = init(target(), config()).unwrap();
        let found = session.locate_process_event(Address::new(OBJECT)).unwrap();
        assert_eq!(found.slot_index, 66);
        assert_eq!(found.score, 4);
        assert_eq!(found.method, LocateMethod::Heuristic);
    }

    #[test]
    fn test_locate_prefers_symbol() {
        let symbols = ImageSymbols::from_symbols(
            BASE,
            [("__ZN7UObject12ProcessEventEP9UFunctionPv".to_string(), CODE + 3 * 0x200)],
        )
        .with_runtime_base(Address::new(BASE));
        let session = Session::init(Arc::new(target()), &ConfigProfile::new(config()), Some(&symbols)).unwrap();
        assert_eq!(session.process_event_symbol(), Some(Address::new(CODE + 3 * 0x200)));

        let found = session.locate_process_event(Address::new(OBJECT)).unwrap();
        assert_eq!(found.slot_index, 3);
        assert_eq!(found.method, LocateMethod::Symbol);
    }

    #[test]
    fn test_find_aligned_pointer() {
        let session = init(target(), config()).unwrap();
        let guobject = Address::new(BASE + GUOBJECT_RVA);
        assert_eq!(
            session.find_aligned_pointer(guobject, 0x40, Address::new(ITEMS)),
            guobject + 0x10
        );
        assert!(session.find_aligned_pointer(guobject + 4, 0x40, Address::new(ITEMS)).is_null());
    }

    #[test]
    fn test_init_error_codes() {
        let err = init(SnapshotMemory::new(), config()).err().unwrap();
        assert_eq!(err, InitError::PtrValidator);
        assert_eq!(err.code(), 1);

        let mut memory = SnapshotMemory::new();
        memory.map_zeroed("anon", Address::new(0x5000), 0x100, Protection::READ).unwrap();
        assert_eq!(init(memory, config()).err().unwrap().code(), 2);

        let mut no_offsets = config();
        no_offsets.offsets = None;
        assert_eq!(init(target(), no_offsets).err().unwrap().code(), 3);

        let mut bad_names = config();
        bad_names.names_rva = 0x0900_0000;
        assert_eq!(init(target(), bad_names.clone()).err().unwrap().code(), 4);
        bad_names.use_fname_pool = false;
        bad_names.offsets.as_mut().unwrap().fname_entry = Some(FNameEntryOffsets { index: 0, name: 0x10 });
        assert_eq!(init(target(), bad_names).err().unwrap().code(), 5);

        let mut bad_objects = config();
        bad_objects.guobject_array_rva = 0x0900_0000;
        assert_eq!(init(target(), bad_objects).err().unwrap().code(), 6);

        let mut bad_storage = config();
        bad_storage.guobject_array_rva = NAMES_RVA + 0x2000 - 0x10;
        assert_eq!(init(target(), bad_storage).err().unwrap().code(), 7);
    }

    #[test]
    fn test_cache_toggle_and_refresh() {
        let mut config = config();
        config.use_region_cache = false;
        let mut session = init(target(), config).unwrap();
        assert!(!session.access().validator().uses_cache());
        assert_eq!(session.resolve_name(4), "Object");

        session.set_use_cache(true);
        assert_eq!(session.refresh_regions(), 7);
        assert_eq!(session.resolve_name(4), "Object");
    }
}
