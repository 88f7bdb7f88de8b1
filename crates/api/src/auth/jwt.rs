//! Access and refresh tokens.
//!
//! Access tokens are short-lived HS256 JWTs whose [`Claims`] carry the
//! person's id and role. Refresh tokens are opaque UUIDs; the database keeps
//! only their SHA-256 digest, so leaking the `sessoes` table does not leak
//! usable tokens.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use selecao_core::types::DbId;

/// Claims carried by every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The person's database id.
    pub sub: DbId,
    /// Role name (`"admin"`, `"equipe"`, `"avaliador"`, ...).
    pub tipo: String,
    /// Expiration (Unix timestamp, UTC).
    pub exp: i64,
    /// Issued-at (Unix timestamp, UTC).
    pub iat: i64,
    /// Token id (UUID v4), for audit trails.
    pub jti: String,
}

impl Claims {
    fn novo(pessoa_id: DbId, tipo_usuario: &str, validade_mins: i64) -> Self {
        let agora = chrono::Utc::now().timestamp();
        Self {
            sub: pessoa_id,
            tipo: tipo_usuario.to_string(),
            exp: agora + validade_mins * 60,
            iat: agora,
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty), `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15) and `JWT_REFRESH_EXPIRY_DAYS` (default 7) from the
    /// environment.
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is absent or empty; the server must not sign
    /// tokens with a guessable default.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_i64("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_i64("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }
}

fn env_i64(nome: &str, padrao: i64) -> i64 {
    match std::env::var(nome) {
        Ok(valor) => valor
            .parse()
            .unwrap_or_else(|_| panic!("{nome} deve ser um inteiro válido")),
        Err(_) => padrao,
    }
}

/// Sign an access token for the given person and role.
pub fn generate_access_token(
    pessoa_id: DbId,
    tipo_usuario: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::novo(pessoa_id, tipo_usuario, config.access_token_expiry_mins);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry, returning the token's [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|dados| dados.claims)
}

/// Mint a refresh token as `(plaintext, sha256_hex)`.
///
/// The plaintext goes to the client; only the digest is persisted.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a refresh token, for storage and lookup.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_com(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn token_assinado_valida_e_carrega_claims() {
        let config = config_com("segredo-de-teste-suficientemente-longo");
        let token = generate_access_token(42, "avaliador", &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.tipo, "avaliador");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn token_expirado_falha() {
        let config = config_com("segredo-de-teste-suficientemente-longo");

        // Expired well past jsonwebtoken's 60-second default leeway.
        let agora = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            tipo: "equipe".to_string(),
            exp: agora - 300,
            iat: agora - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn segredo_diferente_invalida() {
        let token =
            generate_access_token(1, "equipe", &config_com("segredo-alfa")).unwrap();
        assert!(validate_token(&token, &config_com("segredo-bravo")).is_err());
    }

    #[test]
    fn refresh_token_digest_estavel() {
        let (plaintext, digest) = generate_refresh_token();
        assert_eq!(digest, hash_refresh_token(&plaintext));
        assert_eq!(digest.len(), 64);
        assert_ne!(plaintext, digest);
    }
}
