//! Staff Model

use serde::{Deserialize, Serialize};

/// Staff roles. `Admin` additionally may delete customers, manage the item
/// catalog and produce statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Admin,
    User,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(StaffRole::Admin),
            "user" => Some(StaffRole::User),
            _ => None,
        }
    }
}

/// Staff account (admin or regular user)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// "admin" | "user"
    pub role: String,
    #[serde(skip_serializing)]
    pub hash_pass: String,
    pub is_active: bool,
    pub created_at: i64,
}

impl Staff {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        verify_password(&self.hash_pass, password)
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        hash_password(password)
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

pub(crate) fn verify_password(
    hash: &str,
    password: &str,
) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub(crate) fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = Staff::hash_password("secret123").unwrap();
        let staff = Staff {
            id: 1,
            username: "admin".into(),
            name: "Administrator".into(),
            role: "admin".into(),
            hash_pass: hash,
            is_active: true,
            created_at: 0,
        };
        assert!(staff.verify_password("secret123").unwrap());
        assert!(!staff.verify_password("wrong").unwrap());
        assert!(staff.is_admin());
    }
}
