pub mod login;
pub mod me;
pub mod register;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("email already registered")]
    EmailTaken,
}
