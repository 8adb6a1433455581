//! Admin authorization guard: per-tournament shared secret.

use crate::models::{EngineError, Tournament};
use rand::Rng;

const ADMIN_CODE_LEN: usize = 8;
const ADMIN_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a short, human-typable admin code: 8 uppercase alphanumerics.
/// Uniqueness across tournaments is not guaranteed by construction.
pub fn generate_admin_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ADMIN_CODE_LEN)
        .map(|_| ADMIN_CODE_CHARSET[rng.gen_range(0..ADMIN_CODE_CHARSET.len())] as char)
        .collect()
}

/// Gate a mutating operation: a missing code is a request-shape error,
/// a mismatching one an authorization failure.
pub fn authorize(tournament: &Tournament, supplied: Option<&str>) -> Result<(), EngineError> {
    let code = supplied.ok_or(EngineError::AdminCodeRequired)?;
    if code != tournament.admin_code {
        return Err(EngineError::InvalidAdminCode);
    }
    Ok(())
}
