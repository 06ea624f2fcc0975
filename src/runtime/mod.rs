// Fri Oct 16 2026 - Alex

pub mod error;
pub mod names;
pub mod offsets;
pub mod profile;
pub mod session;

pub use error::InitError;
pub use names::{NameResolver, MAX_NAME_BUFFER};
pub use offsets::UeOffsets;
pub use profile::{ConfigProfile, GameProfile};
pub use session::{RuntimeHandles, Session};
