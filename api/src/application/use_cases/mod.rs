pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod files;
pub mod records;
pub mod users;
