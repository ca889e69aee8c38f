use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use super::api_errors::ApiError;

/// Argon2id password hashing for stored user credentials.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Builds a hasher from raw argon2 costs (memory in KiB, iterations, lanes).
    pub fn with_costs(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, ApiError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(Self::new(params))
    }

    /// Returns the PHC string for `password`.
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::InternalError(e.to_string()))
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed = PasswordHash::new(hash).map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}
