//! Route definitions for people and invitations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{convites, pessoas};
use crate::state::AppState;

/// Routes mounted at `/pessoas`.
///
/// The invitation routes are registered before `/{id}` so the literal
/// `convites` segment is not captured as an id.
///
/// ```text
/// GET  /                                   -> list (?tipo=&status=)
/// GET  /convites/pendentes                 -> pendentes
/// POST /convites                           -> criar (individual invite)
/// POST /convites/em-massa/validar          -> em_massa_validar (CSV body)
/// POST /convites/em-massa/confirmar        -> em_massa_confirmar (CSV body)
/// GET  /{id}                               -> get_by_id
/// PUT  /{id}                               -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pessoas::list))
        .route("/convites", post(convites::criar))
        .route("/convites/pendentes", get(pessoas::pendentes))
        .route("/convites/em-massa/validar", post(convites::em_massa_validar))
        .route(
            "/convites/em-massa/confirmar",
            post(convites::em_massa_confirmar),
        )
        .route("/{id}", get(pessoas::get_by_id).put(pessoas::update))
}
