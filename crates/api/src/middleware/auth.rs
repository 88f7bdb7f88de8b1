//! Bearer-token extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use selecao_core::error::CoreError;
use selecao_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated person, taken from the `Authorization: Bearer` header.
///
/// Handlers that need authentication list this as a parameter; requests
/// without a valid token are rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Database id of the person (the token's `sub` claim).
    pub pessoa_id: DbId,
    /// Role name (the token's `tipo` claim).
    pub tipo_usuario: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| nao_autorizado("Credenciais de acesso ausentes ou malformadas"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| nao_autorizado("Sessão inválida ou expirada. Faça login novamente."))?;

        Ok(AuthUser {
            pessoa_id: claims.sub,
            tipo_usuario: claims.tipo,
        })
    }
}

/// The token part of a well-formed `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn nao_autorizado(mensagem: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(mensagem.to_string()))
}
