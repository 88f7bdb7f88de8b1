//! Route definitions for question edit/delete by stable id.
//!
//! Creation and reordering are stage-scoped and live under
//! [`super::estagios`].

use axum::routing::put;
use axum::Router;

use crate::handlers::estagios;
use crate::state::AppState;

/// Routes mounted at `/perguntas`.
///
/// ```text
/// PUT    /{id} -> update_pergunta
/// DELETE /{id} -> delete_pergunta
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(estagios::update_pergunta).delete(estagios::delete_pergunta),
    )
}
