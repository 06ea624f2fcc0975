// Sat Oct 17 2026 - Alex

use crate::memory::Address;
use crate::symbol::{SymbolError, SymbolLookup};
use goblin::elf::program_header::PT_LOAD;
use goblin::mach::{cputype::CPU_TYPE_ARM64, Mach, MachO};
use goblin::Object;
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Symbol table of an on-disk executable image, slid to where the image is
/// loaded in the target.
pub struct ImageSymbols {
    symbols: HashMap<String, u64>,
    preferred_base: u64,
    slide: u64,
}

impl ImageSymbols {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SymbolError> {
        let file = File::open(path.as_ref())?;
        let mmap = unsafe { Mmap::map(&file) }?;
        let symbols = Self::parse(&mmap)?;
        log::debug!(
            "loaded {} symbols from {} (preferred base {:#x})",
            symbols.len(),
            path.as_ref().display(),
            symbols.preferred_base
        );
        Ok(symbols)
    }

    pub fn parse(data: &[u8]) -> Result<Self, SymbolError> {
        match Object::parse(data)? {
            Object::Mach(Mach::Binary(macho)) => Ok(Self::from_macho(&macho)),
            Object::Mach(Mach::Fat(multi)) => {
                let arch = multi
                    .find_cputype(CPU_TYPE_ARM64)?
                    .ok_or_else(|| SymbolError::UnsupportedFormat("fat image has no arm64 slice".to_string()))?;
                let macho = MachO::parse(arch.slice(data), 0)?;
                Ok(Self::from_macho(&macho))
            }
            Object::Elf(elf) => {
                let preferred_base = elf
                    .program_headers
                    .iter()
                    .filter(|ph| ph.p_type == PT_LOAD)
                    .map(|ph| ph.p_vaddr)
                    .min()
                    .unwrap_or(0);

                let mut symbols = HashMap::new();
                for (syms, strtab) in [(&elf.syms, &elf.strtab), (&elf.dynsyms, &elf.dynstrtab)] {
                    for sym in syms.iter() {
                        if sym.st_value == 0 || sym.is_import() {
                            continue;
                        }
                        if let Some(name) = strtab.get_at(sym.st_name).filter(|n| !n.is_empty()) {
                            symbols.entry(name.to_string()).or_insert(sym.st_value);
                        }
                    }
                }
                Ok(Self::from_symbols(preferred_base, symbols))
            }
            _ => Err(SymbolError::UnsupportedFormat("not a Mach-O or ELF image".to_string())),
        }
    }

    fn from_macho(macho: &MachO) -> Self {
        let preferred_base = macho
            .segments
            .iter()
            .find(|s| s.fileoff == 0 && s.filesize > 0)
            .map(|s| s.vmaddr)
            .unwrap_or(0);

        let mut symbols = HashMap::new();
        for (name, nlist) in macho.symbols().flatten() {
            if nlist.n_value == 0 || nlist.is_undefined() || name.is_empty() {
                continue;
            }
            symbols.entry(name.to_string()).or_insert(nlist.n_value);
        }
        Self::from_symbols(preferred_base, symbols)
    }

    pub fn from_symbols<I>(preferred_base: u64, symbols: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        Self {
            symbols: symbols.into_iter().collect(),
            preferred_base,
            slide: 0,
        }
    }

    pub fn with_runtime_base(mut self, base: Address) -> Self {
        self.slide = base.as_u64().wrapping_sub(self.preferred_base);
        self
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn require(&self, name: &str) -> Result<Address, SymbolError> {
        self.find_symbol(name)
            .ok_or_else(|| SymbolError::NotFound(name.to_string()))
    }
}

impl SymbolLookup for ImageSymbols {
    fn find_symbol(&self, name: &str) -> Option<Address> {
        let value = self
            .symbols
            .get(name)
            .or_else(|| self.symbols.get(&format!("_{}", name)))?;
        Some(Address::new(value.wrapping_add(self.slide)))
    }
}
