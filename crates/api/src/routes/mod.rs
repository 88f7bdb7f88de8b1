pub mod auth;
pub mod editais;
pub mod estagios;
pub mod health;
pub mod perguntas;
pub mod pessoas;
pub mod projetos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         identity + menu + projects
/// /auth/primeiro-acesso/verificar                  check invitation code
/// /auth/primeiro-acesso/concluir                   set first password
/// /auth/recuperar-senha/enviar-codigo              e-mail a reset code
/// /auth/recuperar-senha/redefinir                  set a new password
///
/// /pessoas                                         list (?tipo=&status=)
/// /pessoas/{id}                                    get, update
/// /pessoas/convites                                individual invite (POST)
/// /pessoas/convites/pendentes                      pending invitations (GET)
/// /pessoas/convites/em-massa/validar               bulk dry-run (POST, CSV body)
/// /pessoas/convites/em-massa/confirmar             bulk commit (POST, CSV body)
///
/// /editais                                         list, create
/// /editais/{id}                                    get (full tree), update, delete
/// /editais/{id}/estagios                           add stage (POST)
/// /editais/{id}/projetos/importar                  import receipt codes (POST)
///
/// /estagios/{id}                                   update, delete
/// /estagios/{id}/perguntas                         append question (POST)
/// /estagios/{id}/perguntas/reordenar               renumber questions (POST)
/// /estagios/{id}/avaliadores                       roster list, set (GET, PUT)
/// /estagios/{id}/avaliadores/{pessoa_id}/projetos  distribute projects (PUT)
/// /estagios/{id}/distribuicao                      scoreboards (GET)
///
/// /perguntas/{id}                                  update, delete
///
/// /projetos                                        list, create
/// /projetos/{id}                                   get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and account flows.
        .nest("/auth", auth::router())
        // People listings, edits, and invitations.
        .nest("/pessoas", pessoas::router())
        // Calls and call-scoped sub-resources (stages, sheet import).
        .nest("/editais", editais::router())
        // Stage-scoped sub-resources (questions, rosters, scoreboards).
        .nest("/estagios", estagios::router())
        // Question edit/delete by stable id.
        .nest("/perguntas", perguntas::router())
        // Projects.
        .nest("/projetos", projetos::router())
}
