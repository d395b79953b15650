pub mod attendance_repository;
pub mod dashboard_repository;
pub mod files_repository;
pub mod folder_repository;
pub mod record_repository;
pub mod storage_port;
pub mod user_repository;
