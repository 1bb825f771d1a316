//! File-backed state.

pub mod atomic_file;
pub mod permission_json;

pub use atomic_file::write_atomic;
pub use permission_json::PermissionJson;
