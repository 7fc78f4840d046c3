use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHashString, PasswordVerifier},
};

use crate::error::ConfigError;

// Credential check run after the rate limiter lets an attempt through
pub trait Authenticator: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

// Single admin account from configuration, password kept as a PHC-format argon2 hash
pub struct StaticAuthenticator {
    admin: Option<(String, PasswordHashString)>,
}

impl StaticAuthenticator {
    pub fn new(email: Option<&str>, password_hash: Option<&str>) -> Result<Self, ConfigError> {
        let admin = match (email, password_hash) {
            (Some(email), Some(hash)) => {
                let parsed = PasswordHash::new(hash.trim())
                    .map_err(|e| ConfigError::InvalidPasswordHash(e.to_string()))?;
                Some((email.trim().to_lowercase(), parsed.serialize()))
            }
            (None, None) => {
                tracing::warn!("No admin credentials configured, every login will be rejected");
                None
            }
            _ => return Err(ConfigError::IncompleteAdminCredentials),
        };
        Ok(Self { admin })
    }
}

impl Authenticator for StaticAuthenticator {
    fn verify(&self, email: &str, password: &str) -> bool {
        let Some((admin_email, admin_hash)) = &self.admin else {
            return false;
        };

        // verify even on email mismatch so both paths cost the same
        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &admin_hash.password_hash())
            .is_ok();
        let email_ok = email.trim().eq_ignore_ascii_case(admin_email);

        email_ok && password_ok
    }
}

#[cfg(test)]
pub fn hash_password(password: &str) -> String {
    use argon2::{
        Algorithm, Params, Version,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    // small cost parameters keep tests fast, verification reads them from the hash
    let params = Params::new(1024, 1, 1, None).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}
