use roleforge_core::AppError;
use roleforge_domain::{GeneratedPassword, PasswordPolicy};

use super::*;

/// Generates a password satisfying `policy` from OS randomness.
///
/// Bytes at or above the largest multiple of the alphabet size are discarded
/// so every allowed character is equally likely.
pub(super) fn generate_password(policy: &PasswordPolicy) -> AppResult<GeneratedPassword> {
    let alphabet = policy.alphabet();
    if alphabet.is_empty() {
        return Err(AppError::Internal(
            "password policy allows no characters".to_owned(),
        ));
    }

    let alphabet_len = alphabet.len();
    let sample_limit = 256 - (256 % alphabet_len);
    let mut password = String::with_capacity(policy.length());
    let mut buffer = [0u8; 64];

    while password.len() < policy.length() {
        getrandom::fill(&mut buffer)
            .map_err(|error| AppError::Internal(format!("failed to generate password: {error}")))?;

        for byte in buffer {
            if password.len() == policy.length() {
                break;
            }

            let sample = usize::from(byte);
            if sample < sample_limit {
                password.push(char::from(alphabet[sample % alphabet_len]));
            }
        }
    }

    policy.accept(password)
}
