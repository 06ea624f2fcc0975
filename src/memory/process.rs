// Tue Oct 13 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, MemoryRegion};

/// Cross-process reader backed by the OS copy primitive.
pub struct ProcessMemory {
    pid: i32,
    handle: platform::Handle,
    base_address: Address,
}

impl ProcessMemory {
    pub fn attach(pid: i32) -> Result<Self, MemoryError> {
        let handle = platform::open(pid)?;
        let base_address = platform::executable_base(&handle).unwrap_or_default();
        log::debug!("attached to pid {} (image base {})", pid, base_address);
        Ok(Self {
            pid,
            handle,
            base_address,
        })
    }

    pub fn current() -> Result<Self, MemoryError> {
        Self::attach(std::process::id() as i32)
    }

    pub fn pid(&self) -> i32 {
        self.pid
    }

    pub fn enumerate_regions(&self) -> Result<Vec<MemoryRegion>, MemoryError> {
        platform::regions(&self.handle)
    }
}

impl MemoryReader for ProcessMemory {
    fn read_into(&self, addr: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        if buf.is_empty() {
            return Ok(());
        }
        platform::read(&self.handle, addr, buf)
    }

    fn get_regions(&self) -> Result<Vec<MemoryRegion>, MemoryError> {
        self.enumerate_regions()
    }

    fn get_base_address(&self) -> Address {
        self.base_address
    }
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
#[allow(non_camel_case_types)]
mod platform {
    use crate::memory::{Address, MemoryError, MemoryRange, MemoryRegion, Protection};
    use libc::{c_int, c_uint};

    type mach_port_t = c_uint;
    type kern_return_t = c_int;
    type vm_address_t = u64;
    type vm_size_t = u64;
    type vm_prot_t = c_int;
    type vm_region_flavor_t = c_int;
    type vm_region_info_t = *mut c_int;

    const KERN_SUCCESS: kern_return_t = 0;
    const VM_REGION_BASIC_INFO_64: vm_region_flavor_t = 9;
    const VM_REGION_BASIC_INFO_COUNT_64: u32 = 9;

    #[repr(C)]
    #[derive(Debug, Clone, Copy, Default)]
    struct vm_region_basic_info_64 {
        protection: vm_prot_t,
        max_protection: vm_prot_t,
        inheritance: c_uint,
        shared: c_uint,
        reserved: c_uint,
        offset: u64,
        behavior: c_int,
        user_wired_count: u16,
    }

    extern "C" {
        fn mach_task_self() -> mach_port_t;
        fn task_for_pid(target_task: mach_port_t, pid: c_int, task: *mut mach_port_t) -> kern_return_t;
        fn vm_read_overwrite(
            target_task: mach_port_t,
            address: vm_address_t,
            size: vm_size_t,
            data: vm_address_t,
            out_size: *mut vm_size_t,
        ) -> kern_return_t;
        fn mach_vm_region(
            target_task: mach_port_t,
            address: *mut vm_address_t,
            size: *mut vm_size_t,
            flavor: vm_region_flavor_t,
            info: vm_region_info_t,
            info_count: *mut u32,
            object_name: *mut mach_port_t,
        ) -> kern_return_t;
    }

    pub struct Handle {
        task: mach_port_t,
    }

    pub fn open(pid: i32) -> Result<Handle, MemoryError> {
        let self_task = unsafe { mach_task_self() };
        if pid == std::process::id() as i32 {
            return Ok(Handle { task: self_task });
        }

        let mut task: mach_port_t = 0;
        let result = unsafe { task_for_pid(self_task, pid, &mut task) };
        if result != KERN_SUCCESS {
            return Err(MemoryError::ProcessNotFound(format!(
                "task_for_pid({}) failed with error {}. Root privileges may be required.",
                pid, result
            )));
        }
        Ok(Handle { task })
    }

    pub fn read(handle: &Handle, addr: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        let mut out_size: vm_size_t = 0;
        let result = unsafe {
            vm_read_overwrite(
                handle.task,
                addr.as_u64(),
                buf.len() as vm_size_t,
                buf.as_mut_ptr() as vm_address_t,
                &mut out_size,
            )
        };

        if result != KERN_SUCCESS {
            return Err(MemoryError::ReadFailed(addr.as_u64()));
        }
        if out_size as usize != buf.len() {
            return Err(MemoryError::ShortRead {
                address: addr.as_u64(),
                wanted: buf.len(),
                got: out_size as usize,
            });
        }
        Ok(())
    }

    pub fn regions(handle: &Handle) -> Result<Vec<MemoryRegion>, MemoryError> {
        let mut regions = Vec::new();
        let mut address: vm_address_t = 0;

        loop {
            let mut size: vm_size_t = 0;
            let mut info = vm_region_basic_info_64::default();
            let mut info_count: u32 = VM_REGION_BASIC_INFO_COUNT_64;
            let mut object_name: mach_port_t = 0;

            let result = unsafe {
                mach_vm_region(
                    handle.task,
                    &mut address,
                    &mut size,
                    VM_REGION_BASIC_INFO_64,
                    &mut info as *mut _ as vm_region_info_t,
                    &mut info_count,
                    &mut object_name,
                )
            };

            if result != KERN_SUCCESS || size == 0 {
                break;
            }

            let protection = Protection::from_flags(info.protection as u32);
            let range = MemoryRange::from_start_size(Address::new(address), size);
            regions.push(MemoryRegion::new(range, protection, format!("region_{:016x}", address)));

            address = match address.checked_add(size) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(regions)
    }

    pub fn executable_base(handle: &Handle) -> Option<Address> {
        regions(handle)
            .ok()?
            .into_iter()
            .find(|r| r.is_executable())
            .map(|r| r.start())
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use crate::memory::{Address, MemoryError, MemoryRange, MemoryRegion, Protection};
    use libc::c_void;
    use std::fs;
    use std::path::PathBuf;

    pub struct Handle {
        pid: libc::pid_t,
        exe: Option<PathBuf>,
    }

    pub fn open(pid: i32) -> Result<Handle, MemoryError> {
        let proc_dir = PathBuf::from(format!("/proc/{}", pid));
        if !proc_dir.exists() {
            return Err(MemoryError::ProcessNotFound(format!("no such process: {}", pid)));
        }
        let exe = fs::read_link(proc_dir.join("exe")).ok();
        Ok(Handle { pid, exe })
    }

    pub fn read(handle: &Handle, addr: Address, buf: &mut [u8]) -> Result<(), MemoryError> {
        let local = libc::iovec {
            iov_base: buf.as_mut_ptr() as *mut c_void,
            iov_len: buf.len(),
        };
        let remote = libc::iovec {
            iov_base: addr.as_u64() as *mut c_void,
            iov_len: buf.len(),
        };

        let copied = unsafe { libc::process_vm_readv(handle.pid, &local, 1, &remote, 1, 0) };
        if copied < 0 {
            return Err(MemoryError::ReadFailed(addr.as_u64()));
        }
        if copied as usize != buf.len() {
            return Err(MemoryError::ShortRead {
                address: addr.as_u64(),
                wanted: buf.len(),
                got: copied as usize,
            });
        }
        Ok(())
    }

    pub fn regions(handle: &Handle) -> Result<Vec<MemoryRegion>, MemoryError> {
        let maps = fs::read_to_string(format!("/proc/{}/maps", handle.pid))?;
        Ok(maps.lines().filter_map(parse_maps_line).collect())
    }

    pub fn executable_base(handle: &Handle) -> Option<Address> {
        let exe = handle.exe.as_ref()?.to_string_lossy().into_owned();
        regions(handle)
            .ok()?
            .into_iter()
            .filter(|r| r.name() == exe)
            .map(|r| r.start())
            .min()
    }

    /// `start-end perms offset dev inode [path]`
    pub(super) fn parse_maps_line(line: &str) -> Option<MemoryRegion> {
        let mut fields = line.split_whitespace();
        let (start, end) = fields.next()?.split_once('-')?;
        let perms = fields.next()?;
        let name = fields.nth(3).unwrap_or("").to_string();

        let start = u64::from_str_radix(start, 16).ok()?;
        let end = u64::from_str_radix(end, 16).ok()?;
        if end < start {
            return None;
        }

        let range = MemoryRange::new(Address::new(start), Address::new(end));
        Some(MemoryRegion::new(range, Protection::from_maps_perms(perms), name))
    }
}

#[cfg(not(any(target_os = "macos", target_os = "ios", target_os = "linux")))]
mod platform {
    use crate::memory::{Address, MemoryError, MemoryRegion};

    pub struct Handle;

    pub fn open(_pid: i32) -> Result<Handle, MemoryError> {
        Err(MemoryError::NotSupported("process memory access on this platform".to_string()))
    }

    pub fn read(_handle: &Handle, addr: Address, _buf: &mut [u8]) -> Result<(), MemoryError> {
        Err(MemoryError::ReadFailed(addr.as_u64()))
    }

    pub fn regions(_handle: &Handle) -> Result<Vec<MemoryRegion>, MemoryError> {
        Ok(Vec::new())
    }

    pub fn executable_base(_handle: &Handle) -> Option<Address> {
        None
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::platform::parse_maps_line;
    use crate::memory::{Address, Protection};

    #[test]
    fn test_parse_maps_line() {
        let region = parse_maps_line(
            "55d0c0a00000-55d0c0a21000 r-xp 00002000 fd:01 1234   /usr/bin/game",
        )
        .unwrap();
        assert_eq!(region.start(), Address::new(0x55d0c0a00000));
        assert_eq!(region.size(), 0x21000);
        assert_eq!(region.protection(), Protection::READ_EXECUTE);
        assert_eq!(region.name(), "/usr/bin/game");
    }

    #[test]
    fn test_parse_anonymous_mapping() {
        let region = parse_maps_line("7ffd1000-7ffd2000 rw-p 00000000 00:00 0").unwrap();
        assert_eq!(region.name(), "");
        assert!(region.is_readable());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_maps_line("not a mapping").is_none());
    }
}
