//! Route definitions for calls and call-scoped sub-resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{editais, estagios, projetos};
use crate::state::AppState;

/// Routes mounted at `/editais`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id (full stage/question tree)
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// POST   /{id}/estagios           -> create_estagio
/// POST   /{id}/projetos/importar  -> importar (intake sheet)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(editais::list).post(editais::create))
        .route(
            "/{id}",
            get(editais::get_by_id)
                .put(editais::update)
                .delete(editais::delete),
        )
        .route("/{id}/estagios", post(estagios::create_estagio))
        .route("/{id}/projetos/importar", post(projetos::importar))
}
