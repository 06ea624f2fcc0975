// Tue Oct 13 2026 - Alex

use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: u32 {
        const READ = 1;
        const WRITE = 2;
        const EXECUTE = 4;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        const READ_EXECUTE = Self::READ.bits() | Self::EXECUTE.bits();
    }
}

impl Protection {
    pub fn from_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & 7)
    }

    pub fn from_maps_perms(perms: &str) -> Self {
        let mut protection = Self::empty();
        let bytes = perms.as_bytes();
        if bytes.first() == Some(&b'r') {
            protection |= Self::READ;
        }
        if bytes.get(1) == Some(&b'w') {
            protection |= Self::WRITE;
        }
        if bytes.get(2) == Some(&b'x') {
            protection |= Self::EXECUTE;
        }
        protection
    }

    pub fn can_read(self) -> bool {
        self.contains(Self::READ)
    }

    pub fn can_write(self) -> bool {
        self.contains(Self::WRITE)
    }

    pub fn can_execute(self) -> bool {
        self.contains(Self::EXECUTE)
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.can_read() { 'r' } else { '-' },
            if self.can_write() { 'w' } else { '-' },
            if self.can_execute() { 'x' } else { '-' },
        )
    }
}
