// Fri Oct 16 2026 - Alex

use crate::memory::Address;
use thiserror::Error;

/// Which session precondition failed; `code()` is stable per variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitError {
    #[error("Region cache is empty, pointer validator cannot start")]
    PtrValidator,
    #[error("Executable base address could not be resolved")]
    ExecutableNotFound,
    #[error("Offsets catalogue missing: {0}")]
    Offsets(String),
    #[error("Name pool pointer {0} is not readable")]
    NamePool(Address),
    #[error("GNames pointer {0} is not readable")]
    GNames(Address),
    #[error("GUObjectArray pointer {0} is not readable")]
    GUObjectArray(Address),
    #[error("ObjObjects storage at {0} could not be read")]
    ObjObjects(Address),
}

impl InitError {
    pub const SUCCESS: i32 = 0;

    pub fn code(&self) -> i32 {
        match self {
            InitError::PtrValidator => 1,
            InitError::ExecutableNotFound => 2,
            InitError::Offsets(_) => 3,
            InitError::NamePool(_) => 4,
            InitError::GNames(_) => 5,
            InitError::GUObjectArray(_) => 6,
            InitError::ObjObjects(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            InitError::PtrValidator,
            InitError::ExecutableNotFound,
            InitError::Offsets(String::new()),
            InitError::NamePool(Address::zero()),
            InitError::GNames(Address::zero()),
            InitError::GUObjectArray(Address::zero()),
            InitError::ObjObjects(Address::zero()),
        ];
        let codes: Vec<i32> = errors.iter().map(InitError::code).collect();
        assert_eq!(codes, (1..=7).collect::<Vec<_>>());
        assert!(!codes.contains(&InitError::SUCCESS));
    }
}
