// Tue Oct 13 2026 - Alex

pub mod access;
pub mod address;
pub mod error;
pub mod local;
pub mod process;
pub mod protection;
pub mod range;
pub mod region;
pub mod scanner;
pub mod snapshot;
pub mod traits;
pub mod validator;

pub use access::MemoryAccess;
pub use address::{Address, POINTER_SIZE};
pub use error::MemoryError;
pub use local::LocalMemory;
pub use process::ProcessMemory;
pub use protection::Protection;
pub use range::MemoryRange;
pub use region::MemoryRegion;
pub use scanner::find_aligned_pointer_reference;
pub use snapshot::SnapshotMemory;
pub use traits::MemoryReader;
pub use validator::PointerValidator;
