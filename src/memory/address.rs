// Tue Oct 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

pub const POINTER_SIZE: u64 = std::mem::size_of::<u64>() as u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    value: u64,
}

impl Address {
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    pub const fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self { value: ptr as u64 }
    }

    pub const fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.value as *const u8
    }

    pub const fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn is_aligned(&self, alignment: u64) -> bool {
        alignment != 0 && self.value % alignment == 0
    }

    pub fn is_pointer_aligned(&self) -> bool {
        self.is_aligned(POINTER_SIZE)
    }

    pub fn align_down(&self, alignment: u64) -> Self {
        Self { value: self.value & !(alignment - 1) }
    }

    pub fn offset(&self, offset: i64) -> Self {
        Self { value: self.value.wrapping_add_signed(offset) }
    }

    pub fn checked_add(&self, rhs: u64) -> Option<Self> {
        self.value.checked_add(rhs).map(Self::new)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self::Output {
        Self { value: self.value.wrapping_add(rhs) }
    }
}

impl Sub<u64> for Address {
    type Output = Self;
    fn sub(self, rhs: u64) -> Self::Output {
        Self { value: self.value.wrapping_sub(rhs) }
    }
}

impl Sub<Address> for Address {
    type Output = i64;
    fn sub(self, rhs: Address) -> Self::Output {
        self.value.wrapping_sub(rhs.value) as i64
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
