//! Shared-secret checks for submitters and the admin.
//!
//! Both secrets are compared as SHA-256 digests so the comparison time does
//! not depend on how much of the candidate matches.

use fantrax_core::error::CoreError;
use sha2::{Digest, Sha256};

use crate::config::ServerConfig;
use crate::error::AppError;

fn digest_eq(candidate: &str, expected: &str) -> bool {
    Sha256::digest(candidate.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Reject the request with 401 unless `candidate` is the admin password.
pub fn require_admin(config: &ServerConfig, candidate: &str) -> Result<(), AppError> {
    if digest_eq(candidate, &config.admin_password) {
        Ok(())
    } else {
        tracing::warn!("Rejected admin request with invalid password");
        Err(CoreError::Unauthorized("Invalid password".into()).into())
    }
}

/// Reject the submission with 403 unless `candidate` is the access code.
pub fn require_access_code(config: &ServerConfig, candidate: &str) -> Result<(), AppError> {
    if digest_eq(candidate, &config.access_code) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Invalid access code".into()).into())
    }
}
