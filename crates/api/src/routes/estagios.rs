//! Route definitions for stage-scoped operations.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{avaliadores, estagios};
use crate::state::AppState;

/// Routes mounted at `/estagios`.
///
/// ```text
/// PUT    /{id}                                   -> update_estagio
/// DELETE /{id}                                   -> delete_estagio
/// POST   /{id}/perguntas                         -> create_pergunta (append)
/// POST   /{id}/perguntas/reordenar               -> reordenar_perguntas
/// GET    /{id}/avaliadores                       -> roster list
/// PUT    /{id}/avaliadores                       -> selecionar (set roster)
/// PUT    /{id}/avaliadores/{pessoa_id}/projetos  -> distribuir (overwrite)
/// GET    /{id}/distribuicao                      -> scoreboards
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(estagios::update_estagio).delete(estagios::delete_estagio),
        )
        .route("/{id}/perguntas", post(estagios::create_pergunta))
        .route(
            "/{id}/perguntas/reordenar",
            post(estagios::reordenar_perguntas),
        )
        .route(
            "/{id}/avaliadores",
            get(avaliadores::list).put(avaliadores::selecionar),
        )
        .route(
            "/{id}/avaliadores/{pessoa_id}/projetos",
            put(avaliadores::distribuir),
        )
        .route("/{id}/distribuicao", get(avaliadores::distribuicao))
}
