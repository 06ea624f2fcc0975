// Sun Oct 18 2026 - Alex

pub mod report;

pub use report::{IntrospectionReport, ObjectRecord};
