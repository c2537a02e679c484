//! Referral code derivation.

use sha2::{Digest, Sha256};

/// Derive the referral code for an account identifier.
///
/// The code is the first 8 hex characters of `SHA-256("referral_{id}")`,
/// lowercase. Derivation is deterministic, so the code never changes for a
/// given identifier; collisions across identifiers are treated as
/// practically impossible and are not defended against.
///
/// # Examples
///
/// ```
/// use tally_core::referral_code;
///
/// let code = referral_code(42);
/// assert_eq!(code.len(), 8);
/// assert_eq!(code, referral_code(42));
/// assert_ne!(code, referral_code(43));
/// ```
pub fn referral_code(user_id: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("referral_{user_id}").as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..8].to_string()
}
