use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use super::{AuthError, MIN_PASSWORD_LEN};
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::access::role::Role;

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    /// Lowercased emails that register straight into the admin role.
    pub admin_emails: &'a [String],
    pub default_role: &'a str,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> anyhow::Result<UserRow> {
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput("email").into());
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput("password").into());
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken.into());
        }
        let name = match req.name.trim() {
            "" => email.split('@').next().unwrap_or_default().to_string(),
            n => n.to_string(),
        };
        let role = if self.admin_emails.iter().any(|a| a == &email) {
            Role::Admin.as_str().to_string()
        } else {
            Role::parse(self.default_role).as_str().to_string()
        };

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        let user = self.repo.create_user(&email, &name, &hash, &role).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user_registered");
        Ok(user)
    }
}
