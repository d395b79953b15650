pub mod attendance_repository_sqlx;
pub mod beneficiary_repository_sqlx;
pub mod dashboard_repository_sqlx;
pub mod distribution_repository_sqlx;
pub mod donation_repository_sqlx;
pub mod files_repository_sqlx;
pub mod folder_repository_sqlx;
pub mod grant_repository_sqlx;
pub mod partner_repository_sqlx;
pub mod program_repository_sqlx;
pub mod project_repository_sqlx;
pub(crate) mod record_sql;
pub mod user_repository_sqlx;
