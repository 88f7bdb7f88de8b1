//! Route definitions for authentication and account flows.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login                             -> login
/// POST /refresh                           -> refresh
/// POST /logout                            -> logout
/// GET  /me                                -> me
/// POST /primeiro-acesso/verificar         -> primeiro_acesso_verificar
/// POST /primeiro-acesso/concluir          -> primeiro_acesso_concluir
/// POST /recuperar-senha/enviar-codigo     -> recuperar_senha_enviar_codigo
/// POST /recuperar-senha/redefinir         -> recuperar_senha_redefinir
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route(
            "/primeiro-acesso/verificar",
            post(auth::primeiro_acesso_verificar),
        )
        .route(
            "/primeiro-acesso/concluir",
            post(auth::primeiro_acesso_concluir),
        )
        .route(
            "/recuperar-senha/enviar-codigo",
            post(auth::recuperar_senha_enviar_codigo),
        )
        .route(
            "/recuperar-senha/redefinir",
            post(auth::recuperar_senha_redefinir),
        )
}
