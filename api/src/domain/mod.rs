pub mod access;
pub mod attendance;
pub mod files;
pub mod records;
