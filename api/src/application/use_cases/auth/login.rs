use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<UserRow>> {
        let email = req.email.trim().to_lowercase();
        let row = match self.repo.find_by_email(&email).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        let hash = match row.password_hash.as_deref() {
            Some(h) => h,
            None => return Ok(None),
        };
        let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(UserRow {
                password_hash: None,
                ..row
            }))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::auth::register::{Register, RegisterRequest};
    use crate::application::test_support::MemUsers;

    #[tokio::test]
    async fn verifies_the_registered_password() {
        let repo = MemUsers::default();
        Register {
            repo: &repo,
            admin_emails: &[],
            default_role: "staff",
        }
        .execute(&RegisterRequest {
            email: "ana@ngo.org".into(),
            name: "Ana".into(),
            password: "correct horse".into(),
        })
        .await
        .unwrap();

        let uc = Login { repo: &repo };
        let ok = uc
            .execute(&LoginRequest {
                email: "ANA@ngo.org".into(),
                password: "correct horse".into(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ok.name, "Ana");
        assert!(ok.password_hash.is_none());

        let bad = uc
            .execute(&LoginRequest {
                email: "ana@ngo.org".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap();
        assert!(bad.is_none());
    }
}
