//! Role-gating extractors.
//!
//! Each wraps [`AuthUser`] and answers 403 when the caller's role is outside
//! the allowed set, so authorization is visible in the handler signature
//! instead of scattered through handler bodies.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use selecao_core::error::CoreError;
use selecao_core::roles::{TIPO_ADMIN, TIPO_EQUIPE};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Admins only.
pub struct RequireAdmin(pub AuthUser);

/// The management surface: `equipe` or `admin`.
pub struct RequireEquipe(pub AuthUser);

async fn exigir(
    parts: &mut Parts,
    state: &AppState,
    permitidos: &[&str],
    mensagem: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !permitidos.contains(&user.tipo_usuario.as_str()) {
        return Err(AppError::Core(CoreError::Forbidden(mensagem.to_string())));
    }
    Ok(user)
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        exigir(
            parts,
            state,
            &[TIPO_ADMIN],
            "Acesso restrito a administradores",
        )
        .await
        .map(RequireAdmin)
    }
}

impl FromRequestParts<AppState> for RequireEquipe {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        exigir(
            parts,
            state,
            &[TIPO_ADMIN, TIPO_EQUIPE],
            "Acesso restrito à equipe da plataforma",
        )
        .await
        .map(RequireEquipe)
    }
}
