//! Password hashing and the platform's strength rule.
//!
//! Hashes are Argon2id in PHC string format, so parameters and salt travel
//! with the hash and can be re-tuned without a migration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum accepted password length.
const MIN_SENHA_LEN: usize = 8;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(senha: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(senha.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A non-matching password is `Ok(false)`; `Err` is reserved for malformed
/// hashes and other operational failures.
pub fn verify_password(senha: &str, hash_armazenado: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(hash_armazenado)?;
    match Argon2::default().verify_password(senha.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(outro) => Err(outro),
    }
}

/// The platform's strength rule: at least 8 characters, with at least one
/// letter and one digit. `Err` carries the user-facing explanation.
pub fn validar_senha(senha: &str) -> Result<(), String> {
    let tem_letra = senha.chars().any(char::is_alphabetic);
    let tem_digito = senha.chars().any(|c| c.is_ascii_digit());
    if senha.chars().count() < MIN_SENHA_LEN || !tem_letra || !tem_digito {
        return Err(
            "Senha deve ter pelo menos 8 caracteres e conter letras e números".to_string(),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifica_a_senha_correta() {
        let hash = hash_password("cavalo-correto-bateria1").unwrap();
        assert!(hash.starts_with("$argon2id$"), "PHC argon2id prefix");
        assert!(verify_password("cavalo-correto-bateria1", &hash).unwrap());
    }

    #[test]
    fn senha_errada_nao_verifica() {
        let hash = hash_password("senha-real-123").unwrap();
        assert!(!verify_password("senha-errada-123", &hash).unwrap());
    }

    #[test]
    fn hash_malformado_e_erro_e_nao_false() {
        assert!(verify_password("qualquer1", "nao-e-um-hash-phc").is_err());
    }

    #[test]
    fn validar_senha_aceita_letras_e_numeros() {
        assert!(validar_senha("abcd1234").is_ok());
    }

    #[test]
    fn validar_senha_exige_digito() {
        assert!(validar_senha("abcdefgh").is_err());
    }

    #[test]
    fn validar_senha_exige_tamanho_e_letra() {
        // 7 characters, digits only: short AND without a letter.
        assert!(validar_senha("1234567").is_err());
        assert!(validar_senha("ab1").is_err());
        // 8 digits without a letter still fails.
        assert!(validar_senha("12345678").is_err());
    }
}
