//! Route definitions for projects.

use axum::routing::get;
use axum::Router;

use crate::handlers::projetos;
use crate::state::AppState;

/// Routes mounted at `/projetos`.
///
/// ```text
/// GET  /      -> list (?codigo_edital=)
/// POST /      -> create
/// GET  /{id}  -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projetos::list).post(projetos::create))
        .route("/{id}", get(projetos::get_by_id))
}
